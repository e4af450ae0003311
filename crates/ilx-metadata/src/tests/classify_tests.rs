use super::*;
use ilx_model::{
    Annotation, MemberDecl, MemberFlags, ProgramBuilder, PropertyDecl, TypeDecl,
};

fn classify(program: &Program, member: MemberId) -> Outcome {
    let store = MetadataStore::build(program);
    let chains = AncestorChains::build(program, 64);
    Classifier::new(program, &store, &chains)
        .classify_member(member)
        .expect("no configuration errors")
}

#[test]
fn test_ignore_dominates_proxy_and_replacement() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Target")).unwrap();
    let run = builder
        .add_member(
            ty,
            MemberDecl::method("Run")
                .annotate(Annotation::Ignore)
                .annotate(Annotation::replacement("noop()")),
        )
        .unwrap();
    let proxy = builder
        .add_type(asm, TypeDecl::class("TargetProxy").annotate(Annotation::proxy("Target")))
        .unwrap();
    builder.add_member(proxy, MemberDecl::method("Run")).unwrap();
    let program = builder.build();

    let outcome = classify(&program, run);
    assert_eq!(
        outcome,
        Outcome::Refused(ReferenceDiagnostic::Refused {
            signature: "Run()".into()
        })
    );
    assert_eq!(outcome.body_source(), BodySource::None);
    assert!(!outcome.is_translatable());
}

#[test]
fn test_nested_type_of_ignored_type_is_ignored() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let outer = builder
        .add_type(asm, TypeDecl::class("Outer").annotate(Annotation::Ignore))
        .unwrap();
    let inner = builder.add_nested_type(outer, TypeDecl::class("Inner")).unwrap();
    let run = builder.add_member(inner, MemberDecl::method("Run")).unwrap();
    let program = builder.build();

    assert!(matches!(classify(&program, run), Outcome::Refused(_)));
}

#[test]
fn test_replacement_member() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Target")).unwrap();
    let now = builder
        .add_member(
            ty,
            MemberDecl::method("Now")
                .returns("System.Int64")
                .annotate(Annotation::replacement("Date.now()")),
        )
        .unwrap();
    let program = builder.build();

    let outcome = classify(&program, now);
    assert_eq!(outcome, Outcome::Replaced("Date.now()".into()));
    assert_eq!(outcome.body_source(), BodySource::Replacement("Date.now()".into()));
    assert!(outcome.is_translatable());
}

#[test]
fn test_proxy_beats_own_body() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Target")).unwrap();
    let run = builder.add_member(ty, MemberDecl::method("Run")).unwrap();
    let proxy = builder
        .add_type(asm, TypeDecl::class("TargetProxy").annotate(Annotation::proxy("Target")))
        .unwrap();
    let proxy_run = builder.add_member(proxy, MemberDecl::method("Run")).unwrap();
    let program = builder.build();

    match classify(&program, run) {
        Outcome::Proxy(body) => {
            assert_eq!(body.member, proxy_run);
            assert_eq!(body.target, run);
        }
        other => panic!("expected a proxy body, got {other:?}"),
    }
}

#[test]
fn test_abstract_member_is_own() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Shape")).unwrap();
    let area = builder
        .add_member(
            ty,
            MemberDecl::method("Area")
                .returns("System.Double")
                .flags(MemberFlags::ABSTRACT),
        )
        .unwrap();
    let program = builder.build();

    assert_eq!(classify(&program, area), Outcome::Own);
}

#[test]
fn test_absent_body_without_directives_is_unimplemented() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Native")).unwrap();
    let call = builder
        .add_member(
            ty,
            MemberDecl::method("Call")
                .param("handle", "System.IntPtr")
                .body(BodyState::Absent),
        )
        .unwrap();
    let program = builder.build();

    assert_eq!(
        classify(&program, call),
        Outcome::Unimplemented(ReferenceDiagnostic::ExternalMethod {
            signature: "void Call(System.IntPtr)".into(),
            type_name: "Native".into(),
        })
    );
}

#[test]
fn test_untranslatable_body() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Test")).unwrap();
    let baz = builder
        .add_member(ty, MemberDecl::method("Baz").body(BodyState::Untranslatable))
        .unwrap();
    let program = builder.build();

    assert_eq!(
        classify(&program, baz),
        Outcome::Unimplemented(ReferenceDiagnostic::Untranslatable {
            signature: "System.Void Test::Baz()".into(),
        })
    );
}

#[test]
fn test_external_property_reports_first_accessor() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Program")).unwrap();
    let ids = builder
        .add_property(
            ty,
            PropertyDecl::new("Property", "System.String")
                .getter()
                .setter()
                .annotate(Annotation::External),
        )
        .unwrap();
    let program = builder.build();

    let expected = ReferenceDiagnostic::ExternalMethod {
        signature: "System.String get_Property()".into(),
        type_name: "Program".into(),
    };
    assert_eq!(
        classify(&program, ids.property),
        Outcome::Unimplemented(expected.clone())
    );
    assert_eq!(
        classify(&program, ids.getter.unwrap()),
        Outcome::Unimplemented(expected)
    );
}

#[test]
fn test_external_type_without_proxy() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder
        .add_type(asm, TypeDecl::class("Ns.Widget").annotate(Annotation::External))
        .unwrap();
    let draw = builder.add_member(ty, MemberDecl::method("Draw")).unwrap();
    let program = builder.build();

    assert_eq!(
        classify(&program, draw),
        Outcome::Unimplemented(ReferenceDiagnostic::ExternalType {
            type_name: "Ns.Widget".into()
        })
    );

    let store = MetadataStore::build(&program);
    let chains = AncestorChains::build(&program, 64);
    assert_eq!(
        Classifier::new(&program, &store, &chains).classify_type(ty),
        TypeOutcome::External
    );
}

#[test]
fn test_translatable_iff_body_source() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("Test");
    let ty = builder.add_type(asm, TypeDecl::class("Mixed")).unwrap();
    let members = [
        builder.add_member(ty, MemberDecl::method("A")).unwrap(),
        builder
            .add_member(ty, MemberDecl::method("B").annotate(Annotation::Ignore))
            .unwrap(),
        builder
            .add_member(ty, MemberDecl::method("C").annotate(Annotation::External))
            .unwrap(),
        builder
            .add_member(ty, MemberDecl::method("D").annotate(Annotation::replacement("d")))
            .unwrap(),
    ];
    let program = builder.build();

    for member in members {
        let outcome = classify(&program, member);
        assert_eq!(
            outcome.is_translatable(),
            outcome.body_source() != BodySource::None,
            "{outcome:?}"
        );
    }
}
