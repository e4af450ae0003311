use super::*;

fn method(declaring: &str, name: &str, params: &[&str]) -> SymbolIdentity {
    SymbolIdentity::member(
        SymbolKind::Method,
        TypeKey::new(declaring),
        SymbolName::named(name),
        params.iter().map(|p| TypeKey::new(*p)),
    )
}

#[test]
fn test_type_key_short_name_and_namespace() {
    let key = TypeKey::new("Acme.Widgets.Outer+Inner");
    assert_eq!(key.short_name(), "Inner");
    assert_eq!(key.namespace(), Some("Acme.Widgets"));

    let global = TypeKey::new("Program");
    assert_eq!(global.short_name(), "Program");
    assert_eq!(global.namespace(), None);

    let generic = TypeKey::new("System.Collections.Generic.List`1");
    assert_eq!(generic.short_name(), "List");
}

#[test]
fn test_element_key_strips_decorations() {
    assert_eq!(TypeKey::new("Foo[][]").element_key(), TypeKey::new("Foo"));
    assert_eq!(TypeKey::new("Foo&").element_key(), TypeKey::new("Foo"));
    assert_eq!(TypeKey::new("Foo*[]").element_key(), TypeKey::new("Foo"));
    assert_eq!(TypeKey::new("Foo").element_key(), TypeKey::new("Foo"));
}

#[test]
fn test_identity_ignores_parameter_names_by_construction() {
    // Only parameter types are part of the key, so two declarations that
    // differ only in parameter names build the same identity.
    let a = method("Calc", "Add", &["System.Int32", "System.Int32"]);
    let b = method("Calc", "Add", &["System.Int32", "System.Int32"]);
    assert_eq!(a, b);

    let c = method("Calc", "Add", &["System.Int32", "System.Double"]);
    assert_ne!(a, c);
}

#[test]
fn test_parameter_order_matters() {
    let a = method("Calc", "Mix", &["System.Int32", "System.String"]);
    let b = method("Calc", "Mix", &["System.String", "System.Int32"]);
    assert_ne!(a, b);
}

#[test]
fn test_non_signature_kinds_drop_params() {
    let field = SymbolIdentity::member(
        SymbolKind::Field,
        TypeKey::new("Program"),
        SymbolName::named("Field"),
        [TypeKey::new("System.Int32")],
    );
    assert!(field.params.is_empty());
}

#[test]
fn test_with_declaring_type_keeps_signature() {
    let proxy = method("BaseClassProxy", "Method1", &[]);
    let target = proxy.with_declaring_type(TypeKey::new("BaseClass"));
    assert_eq!(target, method("BaseClass", "Method1", &[]));
    assert!(proxy.same_signature(&target));
    assert_ne!(proxy, target);
}

#[test]
fn test_operator_identity_uses_operator_kind() {
    let op = SymbolIdentity::member(
        SymbolKind::Operator,
        TypeKey::new("P"),
        SymbolName::Operator(OperatorKind::Addition),
        [TypeKey::new("P"), TypeKey::new("P")],
    );
    let named = SymbolIdentity::member(
        SymbolKind::Method,
        TypeKey::new("P"),
        SymbolName::named("op_Addition"),
        [TypeKey::new("P"), TypeKey::new("P")],
    );
    assert_ne!(op, named);
    assert_eq!(op.name.as_str(), "op_Addition");
}

#[test]
fn test_display() {
    let m = method("Program", "Main", &["System.String[]"]);
    assert_eq!(m.to_string(), "Program::Main(System.String[])");
    assert_eq!(SymbolIdentity::of_type(&TypeKey::new("A.B")).to_string(), "A.B");
}

#[test]
fn test_conversion_operators_key_on_return_type() {
    let to_int = SymbolIdentity::member(
        SymbolKind::Operator,
        TypeKey::new("Money"),
        SymbolName::Operator(OperatorKind::Implicit),
        [TypeKey::new("Money")],
    )
    .returning(&TypeKey::new("System.Int32"));
    let to_string = to_int
        .clone()
        .returning(&TypeKey::new("System.String"));
    assert_ne!(to_int, to_string);
    assert!(!to_int.same_signature(&to_string));
    assert_eq!(
        to_int.to_string(),
        "Money::op_Implicit(Money) : System.Int32"
    );

    let plus = SymbolIdentity::member(
        SymbolKind::Operator,
        TypeKey::new("Money"),
        SymbolName::Operator(OperatorKind::Addition),
        [TypeKey::new("Money"), TypeKey::new("Money")],
    )
    .returning(&TypeKey::new("Money"));
    assert_eq!(plus.returns, None);
}
