//! Interactive ledger shell
//!
//! Reads one command per line, parses it with clap, calls the ledger and
//! prints the outcome. Ledger failures are printed and the shell keeps going.

use std::io::{BufRead, Write};

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::display::account::{format_account_list, format_balance, format_statement};
use crate::error::{TellerError, TellerResult};
use crate::models::Money;
use crate::services::Ledger;

#[derive(Parser, Debug)]
#[command(name = "teller", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

/// Commands accepted at the shell prompt
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Open a new account with a zero balance
    #[command(alias = "open")]
    Create {
        /// Account name (quote names with spaces)
        #[arg(allow_hyphen_values = true)]
        name: String,
    },
    /// Deposit money into an account
    Deposit {
        #[arg(allow_hyphen_values = true)]
        name: String,
        /// Amount such as 100, 25.50 or $25.50
        #[arg(allow_negative_numbers = true)]
        amount: Money,
    },
    /// Withdraw money from an account
    Withdraw {
        #[arg(allow_hyphen_values = true)]
        name: String,
        #[arg(allow_negative_numbers = true)]
        amount: Money,
    },
    /// Show the current balance of an account
    Balance {
        #[arg(allow_hyphen_values = true)]
        name: String,
    },
    /// Show every transaction on an account
    Statement {
        #[arg(allow_hyphen_values = true)]
        name: String,
    },
    /// Move money from one account to another
    Transfer {
        /// Sender
        #[arg(allow_hyphen_values = true)]
        from: String,
        /// Recipient
        #[arg(allow_hyphen_values = true)]
        to: String,
        #[arg(allow_negative_numbers = true)]
        amount: Money,
    },
    /// Delete an account and its history
    Delete {
        #[arg(allow_hyphen_values = true)]
        name: String,
    },
    /// List all accounts
    #[command(alias = "ls")]
    List,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// What the shell should do after a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Message(String),
    Nothing,
    Exit,
}

/// Line-oriented front end over a ledger
pub struct Shell<'a> {
    ledger: &'a Ledger,
    currency_symbol: String,
}

impl<'a> Shell<'a> {
    pub fn new(ledger: &'a Ledger, currency_symbol: impl Into<String>) -> Self {
        Self {
            ledger,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Run until end of input or `quit`
    ///
    /// `interactive` controls the banner and prompt; piped input gets
    /// neither.
    pub fn run<R: BufRead, W: Write>(
        &self,
        mut input: R,
        mut output: W,
        interactive: bool,
    ) -> TellerResult<()> {
        if interactive {
            writeln!(output, "Teller ledger shell. Type 'help' for commands.")?;
        }

        loop {
            if interactive {
                write!(output, "teller> ")?;
                output.flush()?;
            }

            let mut raw = Vec::new();
            if input.read_until(b'\n', &mut raw)? == 0 {
                break;
            }
            let reply = match String::from_utf8(raw) {
                Ok(line) => self.execute(&line),
                Err(_) => Reply::Message("Error: input line is not valid UTF-8".to_string()),
            };

            match reply {
                Reply::Message(message) => writeln!(output, "{}", message)?,
                Reply::Nothing => {}
                Reply::Exit => break,
            }
        }

        output.flush()?;
        Ok(())
    }

    /// Execute a single line of input
    pub fn execute(&self, line: &str) -> Reply {
        let words = match split_words(line) {
            Ok(words) => words,
            Err(err) => return Reply::Message(format!("Error: {}", err)),
        };
        if words.is_empty() {
            return Reply::Nothing;
        }

        match ShellLine::try_parse_from(words) {
            Ok(parsed) => {
                debug!(command = ?parsed.command, "shell command");
                self.dispatch(parsed.command)
                    .unwrap_or_else(|err| Reply::Message(format!("Error: {}", err)))
            }
            // covers `help` as well as usage errors
            Err(err) => Reply::Message(err.to_string().trim_end().to_string()),
        }
    }

    fn dispatch(&self, command: ShellCommand) -> TellerResult<Reply> {
        let message = match command {
            ShellCommand::Create { name } => {
                let account = self.ledger.create_account(&name)?;
                format!(
                    "Account for {} created with balance {}.",
                    account.name,
                    self.money(account.balance)
                )
            }

            ShellCommand::Deposit { name, amount } => {
                let balance = self.ledger.deposit(&name, amount)?;
                format!(
                    "Deposited {}. New balance: {}.",
                    self.money(amount),
                    self.money(balance)
                )
            }

            ShellCommand::Withdraw { name, amount } => {
                let balance = self.ledger.withdraw(&name, amount)?;
                format!(
                    "Withdrew {}. New balance: {}.",
                    self.money(amount),
                    self.money(balance)
                )
            }

            ShellCommand::Balance { name } => {
                format_balance(self.ledger.check_balance(&name)?, &self.currency_symbol)
            }

            ShellCommand::Statement { name } => {
                let statement = self.ledger.print_statement(&name)?;
                format_statement(&statement).trim_end().to_string()
            }

            ShellCommand::Transfer { from, to, amount } => {
                let receipt = self.ledger.transfer(&from, &to, amount)?;
                format!(
                    "Transferred {} from {} to {}.",
                    self.money(receipt.amount),
                    receipt.from,
                    receipt.to
                )
            }

            ShellCommand::Delete { name } => {
                let removed = self.ledger.delete_account(&name)?;
                format!("Account for {} has been deleted.", removed.name)
            }

            ShellCommand::List => {
                format_account_list(&self.ledger.list_accounts()?, &self.currency_symbol)
            }

            ShellCommand::Quit => return Ok(Reply::Exit),
        };

        Ok(Reply::Message(message))
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}

/// Split a line into words, honoring single and double quotes
///
/// `deposit "Jane Doe" 10` yields three words. An empty quoted string is a
/// word of its own.
pub fn split_words(line: &str) -> TellerResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(TellerError::Validation("Unterminated quote".into()));
    }
    if in_word {
        words.push(current);
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::TransactionLog;
    use tempfile::TempDir;

    fn create_test_ledger() -> (Ledger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let log = TransactionLog::new(temp_dir.path().join("transactions.txt"));
        (Ledger::new(log), temp_dir)
    }

    fn message(reply: Reply) -> String {
        match reply {
            Reply::Message(m) => m,
            other => panic!("expected a message, got {other:?}"),
        }
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("deposit alice 10").unwrap(), vec!["deposit", "alice", "10"]);
        assert_eq!(
            split_words("  transfer \"Jane Doe\" 'Bob' 5\n").unwrap(),
            vec!["transfer", "Jane Doe", "Bob", "5"]
        );
        assert_eq!(split_words("create \"\"").unwrap(), vec!["create", ""]);
        assert!(split_words("   ").unwrap().is_empty());
        assert!(split_words("create \"open").unwrap_err().is_validation());
    }

    #[test]
    fn test_full_session() {
        let (ledger, _temp) = create_test_ledger();
        let shell = Shell::new(&ledger, "$");

        assert_eq!(
            message(shell.execute("create A")),
            "Account for A created with balance $0.00."
        );
        shell.execute("create B");
        assert_eq!(
            message(shell.execute("deposit A 100")),
            "Deposited $100.00. New balance: $100.00."
        );
        assert_eq!(
            message(shell.execute("withdraw A 20.5")),
            "Withdrew $20.50. New balance: $79.50."
        );
        assert_eq!(
            message(shell.execute("transfer A B 9.5")),
            "Transferred $9.50 from A to B."
        );
        assert_eq!(message(shell.execute("balance B")), "Current balance: $9.50.");
        assert_eq!(
            message(shell.execute("statement A")),
            "Account statement for A:\n- Deposit: $100\n- Withdrawal: $20.5\n- Transfer to B: $9.5"
        );
        assert_eq!(
            message(shell.execute("delete B")),
            "Account for B has been deleted."
        );
        assert_eq!(shell.execute("quit"), Reply::Exit);
        assert_eq!(shell.execute(""), Reply::Nothing);
    }

    #[test]
    fn test_errors_are_reported_not_fatal() {
        let (ledger, _temp) = create_test_ledger();
        let shell = Shell::new(&ledger, "$");
        shell.execute("create A");

        assert_eq!(
            message(shell.execute("create A")),
            "Error: Account already exists: A"
        );
        assert_eq!(
            message(shell.execute("balance nobody")),
            "Error: Account not found: nobody"
        );
        assert_eq!(
            message(shell.execute("deposit A -5")),
            "Error: Invalid amount -$5.00: amount must be positive"
        );
        assert!(message(shell.execute("deposit A lots")).contains("Invalid money format"));
        assert!(message(shell.execute("frobnicate")).contains("frobnicate"));
        assert_eq!(message(shell.execute("statement A")), "No transactions available.");
    }

    #[test]
    fn test_names_may_start_with_hyphen() {
        let (ledger, _temp) = create_test_ledger();
        let shell = Shell::new(&ledger, "$");

        assert_eq!(
            message(shell.execute("create -savings")),
            "Account for -savings created with balance $0.00."
        );
        shell.execute("create B");
        shell.execute("deposit -savings 10");
        assert_eq!(
            message(shell.execute("transfer -savings B 4")),
            "Transferred $4.00 from -savings to B."
        );
        assert_eq!(message(shell.execute("balance -savings")), "Current balance: $6.00.");
        assert_eq!(
            message(shell.execute("delete -savings")),
            "Account for -savings has been deleted."
        );
    }

    #[test]
    fn test_currency_symbol() {
        let (ledger, _temp) = create_test_ledger();
        let shell = Shell::new(&ledger, "€");
        shell.execute("create A");

        assert_eq!(
            message(shell.execute("deposit A 3")),
            "Deposited €3.00. New balance: €3.00."
        );
        // descriptions keep the ledger's own format
        assert_eq!(ledger.log().read_lines().unwrap(), vec!["A: Deposit: $3"]);
    }

    #[test]
    fn test_run_reads_until_quit() {
        let (ledger, _temp) = create_test_ledger();
        let shell = Shell::new(&ledger, "$");

        let input = b"create A\ndeposit A 5\nquit\ndeposit A 5\n";
        let mut output = Vec::new();
        shell.run(&input[..], &mut output, false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            "Account for A created with balance $0.00.\nDeposited $5.00. New balance: $5.00.\n"
        );
        assert_eq!(ledger.check_balance("A").unwrap(), Money::from_cents(500));
    }

    #[test]
    fn test_run_survives_invalid_utf8_line() {
        let (ledger, _temp) = create_test_ledger();
        let shell = Shell::new(&ledger, "$");

        let mut output = Vec::new();
        shell
            .run(&b"create A\ndeposit A \xff\ndeposit A 5\n"[..], &mut output, false)
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Error: input line is not valid UTF-8"));
        assert!(output.contains("Deposited $5.00. New balance: $5.00."));
        assert_eq!(ledger.check_balance("A").unwrap(), Money::from_cents(500));
    }

    #[test]
    fn test_run_interactive_prompts() {
        let (ledger, _temp) = create_test_ledger();
        let shell = Shell::new(&ledger, "$");

        let mut output = Vec::new();
        shell.run(&b"list\n"[..], &mut output, true).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Teller ledger shell."));
        assert!(output.contains("teller> No accounts found."));
    }
}
