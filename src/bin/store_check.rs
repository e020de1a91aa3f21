use futures::StreamExt;

use notepin::config::NotepinConfig;
use notepin::store;

fn install_logger() -> Result<(), Box<dyn std::error::Error>> {
    systemd_journal_logger::JournalLog::new()?
        .with_syslog_identifier("notepin-store-check".to_string())
        .install()?;
    log::set_max_level(log::LevelFilter::Info);
    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(e) = install_logger() {
        eprintln!("Journal logging unavailable: {}", e);
    }

    let (config, _) = NotepinConfig::load();

    println!("=== Note store check ===\n");
    if config.firestore_project.trim().is_empty() {
        println!("No Firestore project configured; checking the in-memory store.");
    } else {
        println!(
            "Project: {}  collection: {}",
            config.firestore_project, config.collection
        );
    }

    let store = match store::open(&config) {
        Ok(store) => store,
        Err(e) => {
            println!("  Open failed: {}", e);
            return std::process::ExitCode::FAILURE;
        }
    };

    let mut snapshots = store.subscribe();
    match snapshots.next().await {
        Some(Ok(notes)) => {
            println!("{} notes, in display order:\n", notes.len());
            for note in &notes {
                let marker = if note.pinned { "*" } else { " " };
                println!(
                    "  {} {}  [{}]  {}",
                    marker,
                    note.updated_at.format("%Y-%m-%d %H:%M:%S"),
                    note.tags.join(", "),
                    note.title
                );
            }
            std::process::ExitCode::SUCCESS
        }
        Some(Err(e)) => {
            println!("  Query failed: {}", e);
            std::process::ExitCode::FAILURE
        }
        None => {
            println!("  Subscription ended before the first snapshot");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_install_failure_is_reported() {
        // Whether or not a journal is reachable, a second install cannot succeed.
        let _ = install_logger();
        assert!(install_logger().is_err());
    }
}
