/*!
 * Transactions
 *
 * A batch of commands runs with every key it touches locked up front and
 * released only after the last command. Other callers never observe a
 * partially applied batch.
 *
 * There is no rollback. A failing command records its error and the
 * remaining commands still run, as with Redis `EXEC`.
 */

use crate::command::{Cmd, Reply};
use crate::error::Result;
use crate::storage::Slot;
use crate::store::Store;
use crate::value::Value;

/// Delete the value if it is a string equal to `expected`
pub(crate) fn compare_and_delete(slot: &mut Slot, expected: &[u8]) -> bool {
    let matches = matches!(slot.value(), Some(Value::Str(v)) if &v[..] == expected);
    if matches {
        slot.take();
    }
    matches
}

impl Store {
    /// Run `commands` as one isolated batch
    ///
    /// # Arguments
    /// * `commands` - Commands to run, in order
    ///
    /// # Returns
    /// * One result per command, in the same order
    pub fn execute(&self, commands: Vec<Cmd>) -> Vec<Result<Reply>> {
        let keys: Vec<&str> = commands.iter().flat_map(|c| c.keys()).collect();
        let mut locked = self.keyspace().lock(keys);
        commands.iter().map(|cmd| cmd.apply(&mut locked)).collect()
    }

    /// Start queueing a transaction
    pub fn multi(&self) -> Transaction<'_> {
        Transaction {
            store: self,
            queued: Vec::new(),
        }
    }

    /// Delete `key` only if it holds a string equal to `expected`
    ///
    /// A missing key, a different value or a value of another type all
    /// leave the store untouched and return `false`.
    pub fn compare_and_delete(&self, key: &str, expected: impl AsRef<[u8]>) -> bool {
        self.with_key(key, |s| compare_and_delete(s, expected.as_ref()))
    }
}

/// Commands queued for one [`Store::execute`] call
#[must_use = "a transaction does nothing until `exec` is called"]
pub struct Transaction<'s> {
    store: &'s Store,
    queued: Vec<Cmd>,
}

impl<'s> Transaction<'s> {
    /// Queue a command (builder style)
    pub fn cmd(mut self, cmd: Cmd) -> Self {
        self.queued.push(cmd);
        self
    }

    /// Queue a command
    pub fn push(&mut self, cmd: Cmd) {
        self.queued.push(cmd);
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Run everything queued as one batch
    pub fn exec(self) -> Vec<Result<Reply>> {
        self.store.execute(self.queued)
    }

    /// Drop the queued commands without running them
    pub fn discard(self) {}
}
