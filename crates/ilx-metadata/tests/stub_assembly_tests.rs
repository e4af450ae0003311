//! Stub assemblies: declarations survive, ordinary bodies do not.

use ilx_common::ResolverOptions;
use ilx_metadata::{MemberAccess, ResolutionSession, resolve_program};
use ilx_model::{Program, SymbolIdentity, SymbolKind, SymbolName, TypeKey};

const STUBBED: &str = r#"{
  "assemblies": [{
    "name": "Stubbed",
    "annotations": [{ "kind": "stubAssembly" }],
    "types": [
      {
        "name": "Program",
        "isStatic": true,
        "members": [
          { "member": "method", "name": "Main", "isStatic": true,
            "params": [{ "name": "args", "ty": "System.String[]" }] },
          { "member": "property", "name": "A", "ty": "System.Int32", "auto": true, "isStatic": true },
          { "member": "property", "name": "B", "ty": "System.Int32", "getter": {}, "isStatic": true }
        ]
      },
      {
        "name": "T",
        "members": [
          { "member": "constructor" },
          { "member": "property", "name": "D", "ty": "System.Int32", "auto": true },
          { "member": "property", "name": "E", "ty": "System.Int32", "setter": {} },
          { "member": "event", "name": "F", "ty": "System.Action", "auto": true }
        ]
      }
    ]
  }]
}"#;

fn load() -> Program {
    Program::from_json(STUBBED).expect("fixture manifest loads")
}

#[test]
fn test_every_member_is_declared() {
    let program = load();
    let report = resolve_program(&program, ResolverOptions::default()).unwrap();
    let identifiers: Vec<&str> = report
        .types
        .iter()
        .flat_map(|t| &t.members)
        .map(|m| m.identifier.as_str())
        .collect();

    for expected in [
        "Main",
        "get_B",
        "get_A",
        "get_D",
        "set_E",
        "remove_F",
        ".ctor",
        "Program$A$value",
        "T$D$value",
    ] {
        assert!(identifiers.contains(&expected), "{expected} missing from {identifiers:?}");
    }
}

#[test]
fn test_only_synthesized_members_and_constructors_keep_bodies() {
    let program = load();
    let report = resolve_program(&program, ResolverOptions::default()).unwrap();
    let outcome = |signature: &str| {
        report
            .member(signature)
            .unwrap_or_else(|| panic!("{signature} not reported"))
            .outcome
    };

    assert_eq!(outcome("Program::Main(System.String[])"), "unimplemented");
    assert_eq!(outcome("Program::get_B()"), "unimplemented");
    assert_eq!(outcome("T::set_E(System.Int32)"), "unimplemented");

    assert_eq!(outcome("Program::get_A()"), "own");
    assert_eq!(outcome("Program::set_A(System.Int32)"), "own");
    assert_eq!(outcome("T::get_D()"), "own");
    assert_eq!(outcome("T::add_F(System.Action)"), "own");
    assert_eq!(outcome("T::remove_F(System.Action)"), "own");
    assert_eq!(outcome("T::.ctor()"), "own");
}

#[test]
fn test_invoking_stubbed_main_reports_external_method() {
    let program = load();
    let mut session = ResolutionSession::new(&program, ResolverOptions::default());
    let main = program
        .lookup_member(&SymbolIdentity::member(
            SymbolKind::Method,
            TypeKey::new("Program"),
            SymbolName::named("Main"),
            [TypeKey::new("System.String[]")],
        ))
        .unwrap();

    let resolved = session.resolve_member(main).unwrap();
    assert_eq!(resolved.identifier, "Main");
    assert!(!resolved.translatable());
    match session.check_invocation(main).unwrap() {
        MemberAccess::Rejected(diag) => assert_eq!(
            diag.message_text,
            "The external method 'void Main(System.String[])' of type 'Program' has not been implemented."
        ),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn test_proxy_supplies_stubbed_body() {
    let manifest = r#"{
      "assemblies": [
        { "name": "Stubbed", "annotations": [{ "kind": "stubAssembly" }],
          "types": [{ "name": "Program", "members": [{ "member": "method", "name": "Run" }] }] },
        { "name": "Proxies",
          "types": [{ "name": "ProgramProxy",
                      "annotations": [{ "kind": "proxy", "value": { "target": "Program" } }],
                      "members": [{ "member": "method", "name": "Run" }] }] }
      ]
    }"#;
    let program = Program::from_json(manifest).unwrap();
    let report = resolve_program(&program, ResolverOptions::default()).unwrap();

    let run = report.member("Program::Run()").unwrap();
    assert_eq!(run.outcome, "proxy");
    assert_eq!(run.proxy.as_deref(), Some("ProgramProxy::Run()"));
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_frozen_table_emits_only_available_bodies() {
    let program = load();
    let table = ResolutionSession::new(&program, ResolverOptions::default())
        .freeze()
        .unwrap();

    let bodies: Vec<String> = table
        .emitted_bodies(&program)
        .into_iter()
        .map(|id| program.identity_of_member(id).to_string())
        .collect();
    assert_eq!(
        bodies,
        vec![
            "Program::get_A()",
            "Program::set_A(System.Int32)",
            "T::.ctor()",
            "T::get_D()",
            "T::set_D(System.Int32)",
            "T::add_F(System.Action)",
            "T::remove_F(System.Action)",
        ]
    );
}
