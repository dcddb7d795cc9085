use crate::registration_service::{RegisterGuideRequest, UpdateGuideRequest};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt};

#[derive(Debug, PartialEq, Eq)]
pub enum CommandType {
    Register(RegisterGuideRequest),
    Update(UpdateGuideRequest),
    Delete(String), // Guide email
    Show(String), // Guide email
    List,
    Save,
    Help,
    Exit
}

pub const HELP: &str = r#"
ClimbSafe guide commands:
register <email> <password> <first name> <last name> <emergency contact> - register a new guide. Example - register alice secret Alice Smith bob
update <email> <password> <first name> <last name> <emergency contact> - overwrite password, name and emergency contact of a guide. Example - update alice newsecret Alice Jones carl
delete <email> - remove a guide. Example - delete alice
show <email> - print a single guide. Example - show alice
list - print all guides.
save - write guides to the database file now.
exit - saves guides (if anything changed) and stops app.
"#;

pub fn print_help() {
    println!("{}", HELP)
}

pub fn parse_command(line: &str) -> Result<CommandType, String> {
    let args: Vec<&str> = line.split_whitespace().collect();
    if args.is_empty() {
        return Ok(CommandType::Help);
    }

    match (args[0], args.len()) {
        ("register", 6) => Ok(CommandType::Register(RegisterGuideRequest {
            email: args[1].to_string(),
            password: args[2].to_string(),
            first_name: args[3].to_string(),
            last_name: args[4].to_string(),
            emergency_contact: args[5].to_string()
        })),
        ("update", 6) => Ok(CommandType::Update(UpdateGuideRequest {
            email: args[1].to_string(),
            password: args[2].to_string(),
            first_name: args[3].to_string(),
            last_name: args[4].to_string(),
            emergency_contact: args[5].to_string()
        })),
        ("register" | "update", _) => Err(format!("Usage: {} <email> <password> <first name> <last name> <emergency contact>", args[0])),
        ("delete", 2) => Ok(CommandType::Delete(args[1].to_string())),
        ("show", 2) => Ok(CommandType::Show(args[1].to_string())),
        ("delete" | "show", _) => Err(format!("Usage: {} <email>", args[0])),
        ("list", 1) => Ok(CommandType::List),
        ("save", 1) => Ok(CommandType::Save),
        ("help", 1) => Ok(CommandType::Help),
        ("exit", 1) => Ok(CommandType::Exit),
        ("list" | "save" | "help" | "exit", _) => Err(format!("{} takes no arguments", args[0])),
        (unknown, _) => Err(format!("Unknown command: {}. Type help to list commands.", unknown))
    }
}

/// Prompts until a valid command arrives. End of input counts as `exit`.
pub async fn wait_for_command<R: AsyncBufRead + Unpin>(input: &mut R) -> Result<CommandType, std::io::Error> {
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"$ ").await?;
        stdout.flush().await?;

        let mut line = String::new();
        if input.read_line(&mut line).await? == 0 {
            return Ok(CommandType::Exit);
        }

        match parse_command(&line) {
            Ok(command) => { return Ok(command); }
            Err(e) => { println!("{}", e); }
        }
    }
}

#[test]
fn test_parse_command() {
    assert_eq!(parse_command("register alice pw Alice Smith bob\n"), Ok(CommandType::Register(RegisterGuideRequest {
        email: "alice".to_string(), password: "pw".to_string(), first_name: "Alice".to_string(), last_name: "Smith".to_string(), emergency_contact: "bob".to_string()
    })));
    assert_eq!(parse_command("  update alice pw2  Alice Jones carl"), Ok(CommandType::Update(UpdateGuideRequest {
        email: "alice".to_string(), password: "pw2".to_string(), first_name: "Alice".to_string(), last_name: "Jones".to_string(), emergency_contact: "carl".to_string()
    })));
    assert_eq!(parse_command("delete alice"), Ok(CommandType::Delete("alice".to_string())));
    assert_eq!(parse_command("show alice"), Ok(CommandType::Show("alice".to_string())));
    assert_eq!(parse_command("list"), Ok(CommandType::List));
    assert_eq!(parse_command("save"), Ok(CommandType::Save));
    assert_eq!(parse_command("exit"), Ok(CommandType::Exit));
    assert_eq!(parse_command("   "), Ok(CommandType::Help));
}

#[test]
fn test_parse_command_errors() {
    assert_eq!(parse_command("register alice pw Alice"), Err("Usage: register <email> <password> <first name> <last name> <emergency contact>".to_string()));
    assert_eq!(parse_command("delete"), Err("Usage: delete <email>".to_string()));
    assert_eq!(parse_command("show a b"), Err("Usage: show <email>".to_string()));
    assert_eq!(parse_command("list all"), Err("list takes no arguments".to_string()));
    assert_eq!(parse_command("climb"), Err("Unknown command: climb. Type help to list commands.".to_string()));
}

#[tokio::test]
async fn test_wait_for_command_skips_invalid_lines() {
    let mut input = tokio::io::BufReader::new(&b"bogus\ndelete\nshow alice\n"[..]);
    assert_eq!(wait_for_command(&mut input).await.unwrap(), CommandType::Show("alice".to_string()));
    assert_eq!(wait_for_command(&mut input).await.unwrap(), CommandType::Exit);
}
