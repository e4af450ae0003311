//! Sessions, frozen tables and the whole-program report.

use ilx_common::ResolverOptions;
use ilx_metadata::{
    ConfigurationError, Outcome, ResolutionSession, TypeOutcome, resolve_program,
};
use ilx_model::{Annotation, BodyState, MemberDecl, MemberId, Program, ProgramBuilder, TypeDecl};
use rayon::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("ilx_metadata=trace")
        .try_init();
}

struct Fixture {
    program: Program,
    members: Vec<MemberId>,
}

/// A mix of every outcome: own, proxied, replaced, unimplemented, refused.
fn fixture() -> Fixture {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("App");
    let base = builder.add_type(asm, TypeDecl::class("App.Widget")).unwrap();
    let mut members = vec![
        builder.add_member(base, MemberDecl::method("Draw")).unwrap(),
        builder
            .add_member(base, MemberDecl::method("Measure").returns("System.Int32"))
            .unwrap(),
        builder
            .add_member(
                base,
                MemberDecl::method("Now")
                    .returns("System.DateTime")
                    .annotate(Annotation::replacement("Date.now()")),
            )
            .unwrap(),
        builder
            .add_member(base, MemberDecl::method("Native").annotate(Annotation::External))
            .unwrap(),
        builder
            .add_member(base, MemberDecl::method("Debug").annotate(Annotation::Ignore))
            .unwrap(),
        builder
            .add_member(
                base,
                MemberDecl::method("Unsafe").body(BodyState::Untranslatable),
            )
            .unwrap(),
    ];
    let derived = builder
        .add_type(asm, TypeDecl::class("App.Button").extends("App.Widget"))
        .unwrap();
    members.push(builder.add_member(derived, MemberDecl::method("Click")).unwrap());

    let proxy = builder
        .add_type(
            asm,
            TypeDecl::class("App.WidgetProxy").annotate(Annotation::proxy("App.Widget")),
        )
        .unwrap();
    builder
        .add_member(proxy, MemberDecl::method("Measure").returns("System.Int32"))
        .unwrap();

    Fixture {
        program: builder.build(),
        members,
    }
}

#[test]
fn test_frozen_table_is_shared_across_threads() {
    init_tracing();
    let Fixture { program, members } = fixture();
    let table = ResolutionSession::new(&program, ResolverOptions::default())
        .freeze()
        .unwrap();

    let verdicts: Vec<(MemberId, bool)> = members
        .par_iter()
        .map(|&id| {
            let access = table.check_invocation(id).expect("member was frozen");
            (id, access.is_allowed())
        })
        .collect();

    let allowed: Vec<&str> = verdicts
        .iter()
        .filter(|(_, allowed)| *allowed)
        .map(|(id, _)| program.member(*id).name.as_str())
        .collect();
    assert_eq!(allowed, vec!["Draw", "Measure", "Now", "Click"]);

    // Lookups from worker threads agree with each other.
    let outcomes: Vec<&'static str> = members
        .par_iter()
        .map(|&id| table.member(id).unwrap().outcome.label())
        .collect();
    assert_eq!(
        outcomes,
        vec![
            "own",
            "proxy",
            "replaced",
            "unimplemented",
            "refused",
            "unimplemented",
            "own"
        ]
    );
}

#[test]
fn test_cached_and_uncached_sessions_agree() {
    let Fixture { program, members } = fixture();
    let mut cached = ResolutionSession::new(&program, ResolverOptions::default());
    let mut uncached = ResolutionSession::new(&program, ResolverOptions::uncached());

    for _ in 0..2 {
        for &id in &members {
            assert_eq!(
                cached.resolve_member(id).unwrap(),
                uncached.resolve_member(id).unwrap()
            );
        }
    }

    let n = members.len() as u64;
    assert_eq!(cached.cache_stats().hits, n);
    assert_eq!(cached.cache_stats().misses, n);
    assert_eq!(uncached.cache_stats().hits, 0);
    assert_eq!(uncached.cache_stats().misses, 2 * n);
}

#[test]
fn test_sessions_are_independent() {
    let Fixture { program, members } = fixture();
    let mut first = ResolutionSession::new(&program, ResolverOptions::default());
    first.resolve_member(members[0]).unwrap();
    first.resolve_member(members[0]).unwrap();

    let second = ResolutionSession::new(&program, ResolverOptions::default());
    assert_eq!(first.cache_stats().hits, 1);
    assert_eq!(second.cache_stats().hits, 0);
    assert_eq!(second.cache_stats().misses, 0);
}

#[test]
fn test_options_from_json_drive_the_session() {
    let Fixture { program, members } = fixture();
    let options = ResolverOptions::from_json(
        r#"{ "optimizer": { "cacheTypeExpressions": false }, "completeUnimplementedMessages": false }"#,
    )
    .unwrap();
    assert!(!options.caching_enabled());

    let mut session = ResolutionSession::new(&program, options);
    let native = members[3];
    let message = match session.check_invocation(native).unwrap() {
        ilx_metadata::MemberAccess::Rejected(diag) => diag.message_text,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(
        message,
        "The external method 'void Native()' of type 'App.Widget' has not"
    );
    assert_eq!(session.cache_stats().hits, 0);
}

#[test]
fn test_report_serializes_to_json() {
    init_tracing();
    let Fixture { program, .. } = fixture();
    let report = resolve_program(&program, ResolverOptions::default()).unwrap();

    // Proxy types are not part of the report.
    assert!(report.ty("App.WidgetProxy").is_none());
    assert_eq!(report.types.len(), 2);
    assert_eq!(report.diagnostics.len(), 3);

    let measure = report.member("App.Widget::Measure()").unwrap();
    assert_eq!(measure.proxy.as_deref(), Some("App.WidgetProxy::Measure()"));

    let json = serde_json::to_value(&report).unwrap();
    let widget = &json["types"][0];
    assert_eq!(widget["name"], "App.Widget");
    assert_eq!(widget["outcome"], "own");
    let now = &widget["members"][2];
    assert_eq!(now["identifier"], "Now");
    assert_eq!(now["replacement"], "Date.now()");
    assert_eq!(now["translatable"], true);
    assert!(now.get("diagnostic").is_none());

    let debug = &widget["members"][4];
    assert_eq!(debug["outcome"], "refused");
    assert_eq!(
        debug["diagnostic"]["message_text"],
        "an attempt was made to reference the member 'Debug()'"
    );
    assert_eq!(json["cache"]["hits"], 0);
}

#[test]
fn test_inheritance_cycle_aborts_program() {
    let mut builder = ProgramBuilder::new();
    let asm = builder.add_assembly("App");
    builder.add_type(asm, TypeDecl::class("A").extends("B")).unwrap();
    let b = builder.add_type(asm, TypeDecl::class("B").extends("A")).unwrap();
    builder.add_member(b, MemberDecl::method("Run")).unwrap();
    let program = builder.build();

    let err = resolve_program(&program, ResolverOptions::default()).unwrap_err();
    assert!(matches!(err, ConfigurationError::InheritanceTooDeep { .. }));
}

#[test]
fn test_type_outcomes_in_table() {
    let Fixture { program, .. } = fixture();
    let table = ResolutionSession::new(&program, ResolverOptions::default())
        .freeze()
        .unwrap();
    assert_eq!(table.types().count(), 2);
    assert!(table.types().all(|t| t.outcome == TypeOutcome::Own));
    assert!(
        table
            .members()
            .any(|m| matches!(m.outcome, Outcome::Replaced(ref e) if e == "Date.now()"))
    );
}
