use super::*;
use ilx_model::{
    AccessorDecl, Annotation, EventDecl, MemberDecl, ProgramBuilder, PropertyDecl, SymbolKind,
    SymbolName, TypeDecl,
};

fn renamed_accessor(name: &str) -> AccessorDecl {
    AccessorDecl::new().annotate(Annotation::rename(name))
}

#[test]
fn test_accessors_follow_renamed_property() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Person")).unwrap();
    let ids = builder
        .add_property(
            ty,
            PropertyDecl::new("Name", "System.String")
                .getter()
                .setter_with(renamed_accessor("AssignName"))
                .annotate(Annotation::rename("FullName")),
        )
        .unwrap();
    let event = builder
        .add_event(
            ty,
            EventDecl::new("Changed", "System.Action").annotate(Annotation::rename("Updated")),
        )
        .unwrap();
    let program = builder.build();
    let store = MetadataStore::build(&program);
    let rewriter = IdentifierRewriter::new(&program, &store);

    assert_eq!(rewriter.member_name(ids.property), "FullName");
    assert_eq!(rewriter.member_name(ids.getter.unwrap()), "get_FullName");
    // An accessor's own rename wins.
    assert_eq!(rewriter.member_name(ids.setter.unwrap()), "AssignName");
    assert_eq!(rewriter.member_name(event.add), "add_Updated");
    assert_eq!(rewriter.member_name(event.remove), "remove_Updated");
}

#[test]
fn test_backing_field_name() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Program")).unwrap();
    let ids = builder
        .add_property(ty, PropertyDecl::new("A", "System.Int32").auto().is_static())
        .unwrap();
    let program = builder.build();
    let store = MetadataStore::build(&program);

    assert_eq!(
        IdentifierRewriter::new(&program, &store).member_name(ids.backing_field.unwrap()),
        "Program$A$value"
    );
}

#[test]
fn test_qualified_name_uses_renamed_enclosing_types() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let outer = builder
        .add_type(
            asm,
            TypeDecl::class("Ns.Outer").annotate(Annotation::rename("Shell")),
        )
        .unwrap();
    let inner = builder.add_nested_type(outer, TypeDecl::class("Inner")).unwrap();
    let program = builder.build();
    let store = MetadataStore::build(&program);
    let rewriter = IdentifierRewriter::new(&program, &store);

    assert_eq!(rewriter.qualified_name(inner), "Ns.Shell+Inner");
    assert_eq!(rewriter.type_name(inner), "Inner");
    assert_eq!(rewriter.type_reference(outer), "Ns.Shell");
}

#[test]
fn test_type_replacement_overrides_reference() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder
        .add_type(
            asm,
            TypeDecl::class("System.Console").annotate(Annotation::replacement("$console")),
        )
        .unwrap();
    let program = builder.build();
    let store = MetadataStore::build(&program);
    let rewriter = IdentifierRewriter::new(&program, &store);

    assert_eq!(rewriter.type_reference(ty), "$console");
    assert_eq!(rewriter.qualified_name(ty), "System.Console");
}

#[test]
fn test_emitted_name_by_identity() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Calc")).unwrap();
    builder
        .add_member(
            ty,
            MemberDecl::method("Add")
                .param("a", "System.Int32")
                .annotate(Annotation::rename("plus")),
        )
        .unwrap();
    let program = builder.build();
    let store = MetadataStore::build(&program);
    let rewriter = IdentifierRewriter::new(&program, &store);

    let add = SymbolIdentity::member(
        SymbolKind::Method,
        TypeKey::new("Calc"),
        SymbolName::named("Add"),
        [TypeKey::new("System.Int32")],
    );
    assert_eq!(rewriter.emitted_name(&add), "plus");

    let unloaded = SymbolIdentity::of_type(&TypeKey::new("Other.Library.Thing"));
    assert_eq!(rewriter.emitted_name(&unloaded), "Thing");
}
