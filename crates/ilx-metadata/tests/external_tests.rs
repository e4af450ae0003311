//! External members, external types and untranslatable bodies.

use ilx_common::ResolverOptions;
use ilx_metadata::{FieldEmission, MemberAccess, Outcome, ResolutionSession, TypeOutcome};
use ilx_model::{
    Annotation, BodyState, MemberDecl, MemberFlags, ProgramBuilder, PropertyDecl, TypeDecl,
};

fn rejection(access: MemberAccess) -> String {
    match access {
        MemberAccess::Rejected(diag) => diag.message_text,
        MemberAccess::Allowed { identifier } => panic!("expected a rejection, got '{identifier}'"),
    }
}

#[test]
fn test_external_property_without_proxy() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Program")).unwrap();
    let ids = builder
        .add_property(
            ty,
            PropertyDecl::new("Property", "System.String")
                .getter()
                .annotate(Annotation::External),
        )
        .unwrap();
    let program = builder.build();
    let mut session = ResolutionSession::new(&program, ResolverOptions::default());

    let getter = ids.getter.unwrap();
    // Still declared under its identifier.
    assert_eq!(session.resolve_member(getter).unwrap().identifier, "get_Property");
    let message = rejection(session.check_invocation(getter).unwrap());
    assert!(
        message.contains("method 'System.String get_Property()' of type 'Program' has not"),
        "{message}"
    );
    // Naming it without a call is fine.
    assert!(session.check_reference(getter).unwrap().is_allowed());
}

#[test]
fn test_truncated_unimplemented_message() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Program")).unwrap();
    let run = builder
        .add_member(ty, MemberDecl::method("Run").annotate(Annotation::External))
        .unwrap();
    let program = builder.build();
    let options = ResolverOptions {
        complete_unimplemented_messages: false,
        ..ResolverOptions::default()
    };
    let mut session = ResolutionSession::new(&program, options);

    assert_eq!(
        rejection(session.check_invocation(run).unwrap()),
        "The external method 'void Run()' of type 'Program' has not"
    );
}

#[test]
fn test_external_type_members() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder
        .add_type(asm, TypeDecl::class("Ns.Native").annotate(Annotation::External))
        .unwrap();
    let ctor = builder.add_member(ty, MemberDecl::constructor()).unwrap();
    let handle = builder
        .add_member(ty, MemberDecl::field("handle", "System.IntPtr"))
        .unwrap();
    let program = builder.build();
    let mut session = ResolutionSession::new(&program, ResolverOptions::default());

    assert_eq!(session.resolve_type(ty).outcome, TypeOutcome::External);
    assert_eq!(
        rejection(session.check_reference(ctor).unwrap()),
        "The external type 'Ns.Native' has not been implemented."
    );
    assert_eq!(session.field_emission(handle).unwrap(), FieldEmission::DeclareOnly);
}

#[test]
fn test_external_type_with_proxy_reports_missing_members() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder
        .add_type(asm, TypeDecl::class("Native").annotate(Annotation::External))
        .unwrap();
    let open = builder.add_member(ty, MemberDecl::method("Open")).unwrap();
    let close = builder.add_member(ty, MemberDecl::method("Close")).unwrap();
    let proxy = builder
        .add_type(asm, TypeDecl::class("NativeProxy").annotate(Annotation::proxy("Native")))
        .unwrap();
    builder.add_member(proxy, MemberDecl::method("Open")).unwrap();
    let program = builder.build();
    let mut session = ResolutionSession::new(&program, ResolverOptions::default());

    assert!(matches!(
        session.resolve_member(open).unwrap().outcome,
        Outcome::Proxy(_)
    ));
    assert_eq!(
        rejection(session.check_invocation(close).unwrap()),
        "The external method 'void Close()' of type 'Native' has not been implemented."
    );
}

#[test]
fn test_external_type_replacement() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder
        .add_type(
            asm,
            TypeDecl::class("System.Math")
                .annotate(Annotation::External)
                .annotate(Annotation::replacement("Math")),
        )
        .unwrap();
    let program = builder.build();
    let mut session = ResolutionSession::new(&program, ResolverOptions::default());

    let resolved = session.resolve_type(ty);
    assert_eq!(resolved.reference, "Math");
    assert_eq!(resolved.outcome, TypeOutcome::Replaced("Math".into()));
}

#[test]
fn test_untranslatable_function() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Test")).unwrap();
    let baz = builder
        .add_member(
            ty,
            MemberDecl::method("Baz").is_static().body(BodyState::Untranslatable),
        )
        .unwrap();
    let program = builder.build();
    let mut session = ResolutionSession::new(&program, ResolverOptions::default());

    assert_eq!(
        rejection(session.check_invocation(baz).unwrap()),
        "The function 'System.Void Test::Baz()' could not be translated."
    );
}

#[test]
fn test_external_abstract_member_is_unimplemented() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Shape")).unwrap();
    let plain = builder
        .add_member(ty, MemberDecl::method("Area").flags(MemberFlags::ABSTRACT))
        .unwrap();
    let external = builder
        .add_member(
            ty,
            MemberDecl::method("Perimeter")
                .flags(MemberFlags::ABSTRACT)
                .annotate(Annotation::External),
        )
        .unwrap();
    let program = builder.build();
    let mut session = ResolutionSession::new(&program, ResolverOptions::uncached());

    assert_eq!(session.resolve_member(plain).unwrap().outcome, Outcome::Own);
    assert!(!session.resolve_member(external).unwrap().translatable());
}
