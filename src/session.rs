//! The interactive menu driving a tree from a console
//!
//! Input is read as whitespace-separated tokens, so a choice and its argument may share a
//! line. Each tree operation is timed on its own, excluding prompts and console I/O.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use log::debug;

use crate::{Error, RandomizedTree, Randomness, Result};

/// Default count for the smallest-elements menu entry
pub const DEFAULT_SMALLEST: usize = 10;

/// A menu session over one tree
///
/// The session owns the tree and tears it down when the menu is left.
pub struct Session<I, O, R> {
    tree: RandomizedTree<i32, R>,
    input: I,
    output: O,
    smallest: usize,
    pending: VecDeque<String>,
}

enum Choice {
    Search,
    Insert,
    Remove,
    Smallest,
    Print,
    Exit,
}

impl Choice {
    fn parse(token: &str) -> Option<Self> {
        match token.parse::<u32>().ok()? {
            1 => Some(Choice::Search),
            2 => Some(Choice::Insert),
            3 => Some(Choice::Remove),
            4 => Some(Choice::Smallest),
            5 => Some(Choice::Print),
            6 => Some(Choice::Exit),
            _ => None,
        }
    }
}

impl<I: BufRead, O: Write, R: Randomness> Session<I, O, R> {
    pub fn new(tree: RandomizedTree<i32, R>, input: I, output: O) -> Self {
        Session {
            tree,
            input,
            output,
            smallest: DEFAULT_SMALLEST,
            pending: VecDeque::new(),
        }
    }

    /// Set how many keys the smallest-elements entry lists
    pub fn smallest(mut self, k: usize) -> Self {
        self.smallest = k;
        self
    }

    /// Run the menu until the user exits or input ends, then release the tree
    ///
    /// Returns the number of nodes released.
    pub fn run(mut self) -> Result<usize> {
        loop {
            write!(
                self.output,
                "Select operation:\n\
                 1. Search\n\
                 2. Insert\n\
                 3. Remove\n\
                 4. Get {} smallest elements\n\
                 5. Print tree\n\
                 6. Exit\n\
                 Choice: ",
                self.smallest
            )?;
            self.output.flush()?;

            let Some(token) = self.next_token()? else {
                break;
            };
            let keep_going = match Choice::parse(&token) {
                Some(choice) => self.dispatch(choice),
                None => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Ok(true)
                }
            };
            match keep_going {
                Ok(true) => {}
                Ok(false) => break,
                Err(Error::InvalidNumber { input }) => {
                    writeln!(self.output, "Invalid number: {input}")?;
                }
                Err(e) => return Err(e),
            }
        }
        self.output.flush()?;
        Ok(self.tree.clear())
    }

    // Ok(false) leaves the menu
    fn dispatch(&mut self, choice: Choice) -> Result<bool> {
        match choice {
            Choice::Search => {
                let Some(key) = self.prompt_number::<i32>("Enter element to search: ")? else {
                    return Ok(false);
                };
                let start = Instant::now();
                let found = self.tree.contains(&key);
                let elapsed = start.elapsed();
                debug!("search {key}: found={found} in {elapsed:?}");
                if found {
                    writeln!(self.output, "Element found in tree.")?;
                } else {
                    writeln!(self.output, "Element not found in tree.")?;
                }
                self.report(elapsed)?;
            }
            Choice::Insert => {
                let Some(key) = self.prompt_number::<i32>("Enter element to insert: ")? else {
                    return Ok(false);
                };
                let start = Instant::now();
                self.tree.insert(key);
                let elapsed = start.elapsed();
                debug!("insert {key} in {elapsed:?}, size {}", self.tree.len());
                writeln!(self.output, "Element inserted.")?;
                self.report(elapsed)?;
            }
            Choice::Remove => {
                let Some(key) = self.prompt_number::<i32>("Enter element to remove: ")? else {
                    return Ok(false);
                };
                let start = Instant::now();
                let removed = self.tree.remove(&key);
                let elapsed = start.elapsed();
                debug!("remove {key}: removed={removed} in {elapsed:?}");
                writeln!(self.output, "Element removed (if it existed).")?;
                self.report(elapsed)?;
            }
            Choice::Smallest => {
                let start = Instant::now();
                let keys = self.tree.smallest(self.smallest);
                let elapsed = start.elapsed();
                let listed: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
                writeln!(
                    self.output,
                    "{} smallest elements: {}",
                    self.smallest,
                    listed.join(" ")
                )?;
                self.report(elapsed)?;
            }
            Choice::Print => {
                let Some(depth) =
                    self.prompt_number::<i64>("Enter maximum depth for printing (-1 for no limit): ")?
                else {
                    return Ok(false);
                };
                // any negative depth means no limit
                let max_depth = usize::try_from(depth).ok();
                writeln!(self.output, "Tree structure:")?;
                write!(self.output, "{}", self.tree.dump(max_depth))?;
            }
            Choice::Exit => return Ok(false),
        }
        Ok(true)
    }

    fn report(&mut self, elapsed: Duration) -> Result<()> {
        writeln!(
            self.output,
            "Operation time: {:.6} seconds",
            elapsed.as_secs_f64()
        )?;
        Ok(())
    }

    // None when input ended before an answer arrived
    fn prompt_number<T: std::str::FromStr>(&mut self, prompt: &str) -> Result<Option<T>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let Some(token) = self.next_token()? else {
            return Ok(None);
        };
        token
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidNumber { input: token })
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }
}
