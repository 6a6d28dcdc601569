use kitten_bytecode::VarId;

use crate::symbols::SymbolTable;

#[test]
fn ids_start_at_one_and_increase() {
    let mut table = SymbolTable::new();
    assert_eq!(table.allocate(), VarId(1));
    assert_eq!(table.allocate(), VarId(2));
}

#[test]
fn inner_scope_shadows_and_pops() {
    let mut table = SymbolTable::new();
    let outer = table.allocate();
    table.bind("x", outer);

    table.push_scope();
    assert_eq!(table.resolve("x"), Some(outer));
    let inner = table.allocate();
    table.bind("x", inner);
    table.bind("y", inner);
    assert_eq!(table.resolve("x"), Some(inner));

    table.pop_scope();
    assert_eq!(table.resolve("x"), Some(outer));
    assert_eq!(table.resolve("y"), None);
}

#[test]
fn root_scope_is_never_popped() {
    let mut table = SymbolTable::new();
    table.bind("a", VarId(1));
    table.pop_scope();
    assert_eq!(table.resolve("a"), Some(VarId(1)));

    table.push_scope();
    table.bind("b", VarId(2));
    table.pop_scope();
    assert_eq!(table.resolve("a"), Some(VarId(1)));
    assert_eq!(table.resolve("b"), None);
}
