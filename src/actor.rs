use std::collections::HashMap;
use std::io;
use std::thread;

use crossbeam::channel::{self, Sender};

use crate::error::ConduitError;
use crate::ledger::{credit, debit_clamped, debit_exact};
use crate::traits::Accounts;

enum Command {
    Deposit {
        name:   String,
        amount: u64,
    },
    Withdraw {
        name:   String,
        amount: u64,
        reply:  Sender<u64>,
    },
    TryWithdraw {
        name:   String,
        amount: u64,
        reply:  Sender<Result<u64, ConduitError>>,
    },
    Query {
        name:  String,
        reply: Sender<u64>,
    },
}

/// A ledger owned by a single thread and reached only through messages.
///
/// There is no lock: the actor thread holds the map and applies commands one
/// at a time, in the order they arrive. Handles are cheap to clone; the
/// thread exits once the last handle is dropped.
///
/// # Example
///
/// ```rust
/// use conduit::LedgerActor;
///
/// let ledger = LedgerActor::spawn().unwrap();
/// ledger.deposit("bob", 10);
/// assert_eq!(ledger.withdraw("bob", 4), 4);
/// assert_eq!(ledger.query("bob"), 6);
/// ```
#[derive(Clone)]
pub struct LedgerActor {
    commands: Sender<Command>,
}

impl LedgerActor {
    /// Start the actor thread.
    pub fn spawn() -> io::Result<Self> {
        let (commands, inbox) = channel::unbounded::<Command>();

        thread::Builder::new()
            .name("conduit-ledger".into())
            .spawn(move || {
                log::trace!("ledger actor starting");
                let mut balances = HashMap::new();
                for command in inbox {
                    // A caller that gave up waiting has dropped its reply
                    // receiver; the command still applies.
                    match command {
                        Command::Deposit { name, amount } => {
                            credit(&mut balances, &name, amount);
                        }
                        Command::Withdraw { name, amount, reply } => {
                            reply.send(debit_clamped(&mut balances, &name, amount)).ok();
                        }
                        Command::TryWithdraw { name, amount, reply } => {
                            reply.send(debit_exact(&mut balances, &name, amount)).ok();
                        }
                        Command::Query { name, reply } => {
                            reply.send(balances.get(&name).copied().unwrap_or(0)).ok();
                        }
                    }
                }
                log::trace!("ledger actor exiting");
            })?;

        Ok(Self { commands })
    }

    pub fn deposit(&self, name: &str, amount: u64) {
        let sent = self.commands.send(Command::Deposit {
            name: name.to_owned(),
            amount,
        });
        if sent.is_err() {
            log::warn!("ledger actor unreachable, deposit to '{name}' dropped");
        }
    }

    /// Debit up to `amount`; see [`Ledger::withdraw`](crate::Ledger::withdraw).
    /// Returns 0 if the actor is gone.
    pub fn withdraw(&self, name: &str, amount: u64) -> u64 {
        self.call(|reply| Command::Withdraw {
            name: name.to_owned(),
            amount,
            reply,
        })
        .unwrap_or_else(|_| {
            log::warn!("ledger actor unreachable, withdraw from '{name}' returned 0");
            0
        })
    }

    /// Debit exactly `amount` or nothing.
    ///
    /// # Errors
    ///
    /// The same refusals as [`Ledger::try_withdraw`](crate::Ledger::try_withdraw),
    /// plus [`ConduitError::ActorStopped`].
    pub fn try_withdraw(&self, name: &str, amount: u64) -> Result<u64, ConduitError> {
        self.call(|reply| Command::TryWithdraw {
            name: name.to_owned(),
            amount,
            reply,
        })?
    }

    /// Current balance, or 0 if absent or if the actor is gone.
    pub fn query(&self, name: &str) -> u64 {
        self.call(|reply| Command::Query {
            name: name.to_owned(),
            reply,
        })
        .unwrap_or_else(|_| {
            log::warn!("ledger actor unreachable, query of '{name}' returned 0");
            0
        })
    }

    fn call<R>(&self, command: impl FnOnce(Sender<R>) -> Command) -> Result<R, ConduitError> {
        let (reply, answer) = channel::bounded(1);
        self.commands
            .send(command(reply))
            .map_err(|_| ConduitError::ActorStopped)?;
        answer.recv().map_err(|_| ConduitError::ActorStopped)
    }
}

impl Accounts for LedgerActor {
    fn deposit(&self, name: &str, amount: u64) {
        LedgerActor::deposit(self, name, amount)
    }

    fn withdraw(&self, name: &str, amount: u64) -> u64 {
        LedgerActor::withdraw(self, name, amount)
    }

    fn query(&self, name: &str) -> u64 {
        LedgerActor::query(self, name)
    }
}
