//! Minimal CLI parsing for the server and the client commands.

use std::env;

use anyhow::{Result, bail};

pub const USAGE: &str = "\
Usage:
  bookshelf [serve]                               Run the GraphQL server
  bookshelf search                                Search and save books
  bookshelf saved                                 Browse your saved books
  bookshelf signup <username> <email> <password>  Create an account
  bookshelf login <email> <password>              Log in
  bookshelf logout                                Forget the stored login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Serve,
    Search,
    Saved,
    Signup {
        username: String,
        email: String,
        password: String,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
}

impl Command {
    pub fn from_args() -> Result<Self> {
        Self::parse(env::args().skip(1))
    }

    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let args: Vec<String> = args.into_iter().collect();
        let rest = args.get(1..).unwrap_or_default();

        let command = match args.first().map(String::as_str) {
            None | Some("serve") | Some("--server") => Command::Serve,
            Some("search") => Command::Search,
            Some("saved") => Command::Saved,
            Some("signup") => match rest {
                [username, email, password] => Command::Signup {
                    username: username.clone(),
                    email: email.clone(),
                    password: password.clone(),
                },
                _ => bail!("signup takes <username> <email> <password>\n\n{}", USAGE),
            },
            Some("login") => match rest {
                [email, password] => Command::Login {
                    email: email.clone(),
                    password: password.clone(),
                },
                _ => bail!("login takes <email> <password>\n\n{}", USAGE),
            },
            Some("logout") => Command::Logout,
            Some(other) => bail!("Unknown command: {}\n\n{}", other, USAGE),
        };

        let expected = match command {
            Command::Signup { .. } => 4,
            Command::Login { .. } => 3,
            _ => 1,
        };
        if args.len() > expected {
            bail!("Unexpected argument: {}\n\n{}", args[expected], USAGE);
        }
        Ok(command)
    }

    pub fn is_client(&self) -> bool {
        !matches!(self, Command::Serve)
    }
}
