use runtests_core::BackendRegistry;

/// Print every interpreter the registry can construct
pub fn list_command() {
    let registry = BackendRegistry::builtin();
    let width = registry
        .names()
        .iter()
        .map(|name| name.len())
        .max()
        .unwrap_or(0);

    println!("Available interpreters:");
    for entry in registry.entries() {
        println!("  {:<width$}  {}", entry.name, entry.description);
    }
}
