use clap::Parser;
use clave::cli::commands::access::AccessCommands;
use clave::cli::commands::user::UserCommands;
use clave::cli::{Cli, Commands};
use clave::domain::models::Availability;

#[test]
fn test_parse_user_create_defaults_to_enabled() {
    let cli = Cli::try_parse_from(["clave", "user", "create", "A1", "Ana", "Lopez"]).unwrap();

    match cli.command {
        Commands::User(args) => match args.command {
            UserCommands::Create {
                id,
                name,
                lastname,
                access,
            } => {
                assert_eq!(id, "A1");
                assert_eq!(name, "Ana");
                assert_eq!(lastname, "Lopez");
                assert_eq!(access, Availability::Enabled);
            }
            _ => panic!("Wrong user command"),
        },
        Commands::Access(_) => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_user_create_disabled() {
    let cli = Cli::try_parse_from([
        "clave", "user", "create", "A1", "Ana", "Lopez", "--access", "no",
    ])
    .unwrap();

    match cli.command {
        Commands::User(args) => match args.command {
            UserCommands::Create { access, .. } => assert_eq!(access, Availability::Disabled),
            _ => panic!("Wrong user command"),
        },
        Commands::Access(_) => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_set_access() {
    let cli = Cli::try_parse_from(["clave", "user", "set-access", "A1", "sí"]).unwrap();

    match cli.command {
        Commands::User(args) => match args.command {
            UserCommands::SetAccess { id, access } => {
                assert_eq!(id, "A1");
                assert_eq!(access, Availability::Enabled);
            }
            _ => panic!("Wrong user command"),
        },
        Commands::Access(_) => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_invalid_access_value() {
    let result = Cli::try_parse_from(["clave", "user", "set-access", "A1", "maybe"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_user_list_with_global_json() {
    let cli = Cli::try_parse_from(["clave", "user", "list", "--refresh", "--json"]).unwrap();
    assert!(cli.json);

    match cli.command {
        Commands::User(args) => {
            assert!(matches!(args.command, UserCommands::List { refresh: true }));
        }
        Commands::Access(_) => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_access_recent_default_count() {
    let cli = Cli::try_parse_from(["clave", "access", "recent"]).unwrap();
    assert!(!cli.json);
    assert!(cli.config.is_none());

    match cli.command {
        Commands::Access(args) => match args.command {
            AccessCommands::Recent { count, refresh } => {
                assert_eq!(count, None);
                assert!(!refresh);
            }
            AccessCommands::Watch { .. } => panic!("Wrong access command"),
        },
        Commands::User(_) => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_access_watch() {
    let cli = Cli::try_parse_from([
        "clave",
        "--config",
        "kiosk.yaml",
        "access",
        "watch",
        "-n",
        "5",
        "--interval",
        "3",
        "--iterations",
        "2",
    ])
    .unwrap();

    assert_eq!(cli.config.unwrap().to_str(), Some("kiosk.yaml"));
    match cli.command {
        Commands::Access(args) => match args.command {
            AccessCommands::Watch {
                count,
                interval,
                iterations,
            } => {
                assert_eq!(count, Some(5));
                assert_eq!(interval, 3);
                assert_eq!(iterations, Some(2));
            }
            AccessCommands::Recent { .. } => panic!("Wrong access command"),
        },
        Commands::User(_) => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_missing_subcommand_fails() {
    assert!(Cli::try_parse_from(["clave", "user"]).is_err());
}
