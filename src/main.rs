mod cli;
mod guide_registry;
mod registration_service;
mod reporting;
mod storage;

use cli::CommandType;
use guide_registry::GuideRegistry;
use registration_service::GuideRegistrationService;
use reporting::log;
use reporting::writer::LogWriter;
use storage::JsonFileStore;

use tokio::io::AsyncBufRead;

use std::path::PathBuf;

#[derive(clap::Parser)]
struct Config {
    #[arg(long, required = false, help = "Path to JSON file where guides are kept. Guides live only in memory if omitted.")]
    db: Option<PathBuf>,
    #[arg(long, required = false, help = "path to file where logs file will be saved. Logs go to stderr if omitted.")]
    log_file: Option<PathBuf>,
    #[arg(long, required = false, default_value = "info", help = "Available levels: debug, info, error")]
    log_level: log::Level
}

fn print_outcome(result: Result<(), String>, success: &str) {
    match result {
        Ok(()) => println!("{}", success),
        Err(e) => println!("Error: {}", e)
    }
}

async fn process_commands<R: AsyncBufRead + Unpin>(service: &GuideRegistrationService, store: Option<&JsonFileStore>, input: &mut R) -> Result<(), std::io::Error> {
    cli::print_help();

    loop {
        match cli::wait_for_command(input).await? {
            CommandType::Register(request) => print_outcome(service.register_guide(request).await, "Guide registered."),
            CommandType::Update(request) => print_outcome(service.update_guide(request).await, "Guide updated."),
            CommandType::Delete(email) => print_outcome(service.delete_guide(&email).await, "Guide deleted."),
            CommandType::Show(email) => {
                match service.find_guide(&email).await {
                    Some(guide) => println!("{}", guide),
                    None => println!("No guide with email {}", email)
                }
            }
            CommandType::List => {
                if service.is_empty().await {
                    println!("No guides registered.");
                }
                for guide in service.guides().await {
                    println!("{}", guide);
                }
            }
            CommandType::Save => {
                match store {
                    Some(store) => print_outcome(service.save(store).await, "Guides saved."),
                    None => println!("No database file given, guides are kept in memory only.")
                }
            }
            CommandType::Help => cli::print_help(),
            CommandType::Exit => { return Ok(()); }
        }
    }
}

/// Runs the prompt, then saves pending changes whether the input ended cleanly or broke.
async fn run<R: AsyncBufRead + Unpin>(service: &GuideRegistrationService, store: Option<&JsonFileStore>, mut input: R) -> Result<(), std::io::Error> {
    let result = process_commands(service, store, &mut input).await;

    if let Some(store) = store {
        if service.is_modified().await {
            print_outcome(service.save(store).await, "Guides saved.");
        }
    }
    result
}

#[tokio::main]
async fn main() {
    let config = <Config as clap::Parser>::parse();

    let (log_sender, log_receiver) = reporting::channel();
    let writer = match LogWriter::create(log_receiver, config.log_file, config.log_level) {
        Ok(writer) => writer.start(),
        Err(e) => { println!("Could not open log file: {}", e); return; }
    };

    let store = config.db.map(JsonFileStore::new);
    let service = match store.as_ref() {
        Some(store) => match GuideRegistrationService::load(store, log_sender.clone()) {
            Ok(service) => service,
            Err(e) => { println!("Could not load guides from {:?}: {}", store.path(), e); return; }
        },
        None => GuideRegistrationService::new(GuideRegistry::new(), log_sender.clone())
    };

    if let Err(e) = run(&service, store.as_ref(), tokio::io::BufReader::new(tokio::io::stdin())).await {
        let _ = log_sender.send(log::create("main", log::Level::Error, format!("Reading commands failed: {}", e)));
    }

    drop(service);
    drop(log_sender);
    let _ = writer.await;
}

#[cfg(test)]
struct BrokenInput;

#[cfg(test)]
impl tokio::io::AsyncRead for BrokenInput {
    fn poll_read(self: std::pin::Pin<&mut Self>, _: &mut std::task::Context<'_>, _: &mut tokio::io::ReadBuf<'_>) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Err(std::io::Error::other("stdin closed unexpectedly")))
    }
}

#[tokio::test]
async fn test_unsaved_guides_survive_broken_input() {
    use crate::registration_service::RegisterGuideRequest;
    use crate::storage::GuideStore;

    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("guides.json"));
    let (log_sender, _log_receiver) = reporting::channel();
    let service = GuideRegistrationService::new(GuideRegistry::new(), log_sender);
    let request = RegisterGuideRequest { email: "alice".to_string(), password: "pw".to_string(), first_name: "Alice".to_string(), last_name: "Smith".to_string(), emergency_contact: "bob".to_string() };
    assert_eq!(service.register_guide(request).await, Ok(()));

    assert!(run(&service, Some(&store), tokio::io::BufReader::new(BrokenInput)).await.is_err());
    assert!(!service.is_modified().await);
    let saved = store.load().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name(), "AliceSmith");
}

#[tokio::test]
async fn test_commands_then_exit_saves() {
    use crate::storage::GuideStore;

    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("guides.json"));
    let (log_sender, _log_receiver) = reporting::channel();
    let service = GuideRegistrationService::new(GuideRegistry::new(), log_sender);
    let input = tokio::io::BufReader::new(&b"register alice pw Alice Smith bob\nregister carol pw Carol White dan\ndelete carol\nlist\nexit\n"[..]);

    assert!(run(&service, Some(&store), input).await.is_ok());
    let saved = store.load().unwrap();
    assert_eq!(saved.iter().map(|guide| guide.email()).collect::<Vec<_>>(), vec!["alice"]);
}
