//! Process-wide error handling setup for the binary

/// Initialize error handling for the application
pub fn install_error_handlers() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Replace color-eyre's panic hook so panics also reach the log
    std::panic::set_hook(Box::new(|panic_info| {
        if let Some(location) = panic_info.location() {
            tracing::error!(
                message = %panic_info,
                panic.file = location.file(),
                panic.line = location.line(),
                panic.column = location.column(),
                "Application panic"
            );
        } else {
            tracing::error!(message = %panic_info, "Application panic");
        }

        // If in test environment, don't print the panic (test frameworks handle this)
        if std::env::var_os("RUST_TEST").is_some() {
            return;
        }

        eprintln!("The application panicked! This is a bug and should be reported.");

        if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            eprintln!("Panic message: {}", s);
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            eprintln!("Panic message: {}", s);
        }

        eprintln!("Stack trace:");
        let backtrace = std::backtrace::Backtrace::force_capture();
        eprintln!("{}", backtrace);
    }));

    Ok(())
}
