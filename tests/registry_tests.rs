use command_tree::{
    CommandRegistry, Completion, DuplicatePolicy, Registration, RegistryConfig, Resolution,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

type Handler = fn(&[&str]) -> String;

fn add(args: &[&str]) -> String {
    let sum: i64 = args.iter().filter_map(|a| a.parse::<i64>().ok()).sum();
    sum.to_string()
}

fn echo(args: &[&str]) -> String {
    args.join(" ")
}

fn dispatch(registry: &CommandRegistry<Handler>, line: &str) -> String {
    let mut tokens = line.split_whitespace();
    let label = tokens.next().unwrap_or("");
    let args: Vec<&str> = tokens.collect();
    match registry.resolve(label, &args) {
        Resolution::Found { value, args, .. } => value(args),
        Resolution::Unknown(unknown) => unknown.to_string(),
    }
}

#[test]
fn test_dispatch_to_handlers() {
    init_logging();
    let mut registry: CommandRegistry<Handler> = CommandRegistry::new();
    assert_eq!(registry.register("math.add", add), Ok(Registration::NewLabel));
    assert_eq!(registry.register("echo", echo), Ok(Registration::NewLabel));

    assert_eq!(dispatch(&registry, "math add 3 4"), "7");
    assert_eq!(dispatch(&registry, "echo hello world"), "hello world");
    assert_eq!(
        dispatch(&registry, "math mul 3 4"),
        "unknown subcommand \"mul\" for \"math\", did you mean: add"
    );
    assert_eq!(
        dispatch(&registry, "nope"),
        "unknown command \"nope\", did you mean: echo, math"
    );
}

#[test]
fn test_completion_walkthrough() {
    init_logging();
    let mut registry = CommandRegistry::new();
    for name in &["admin.user.add", "admin.user.remove", "admin.reload", "about"] {
        registry.register(name, name.to_string()).unwrap();
    }

    assert_eq!(registry.labels(), vec!["about", "admin"]);
    assert_eq!(
        registry.complete("admin", &[""]),
        Completion::Candidates(vec!["reload", "user"])
    );
    assert_eq!(
        registry.complete("admin", &["user", "r"]),
        Completion::Candidates(vec!["remove"])
    );

    let args = ["user", "add", "bob"];
    match registry.complete("admin", &args) {
        Completion::Delegate { value, args } => {
            assert_eq!(value, "admin.user.add");
            assert_eq!(args, ["bob"]);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_reject_policy_surfaces_collisions() {
    init_logging();
    let config = RegistryConfig::default()
        .with_separator('/')
        .with_duplicates(DuplicatePolicy::Reject);
    let mut registry = CommandRegistry::with_config(config);

    registry.register("fs/ls", 1).unwrap();
    let err = registry.register("fs/ls", 2).unwrap_err();
    assert_eq!(
        err.to_string(),
        "command \"fs/ls\" collides with an existing registration"
    );
    assert!(registry.register("fs/ls/extra", 3).is_err());
    assert_eq!(registry.register("fs/cat", 4), Ok(Registration::Subcommand));
    assert_eq!(registry.len(), 2);
}
