//! Progress rendering for indexing runs

use ragindex_core::IndexEvent;
use std::io::{self, Write};

/// Prints pipeline events on stderr
pub struct ProgressReporter {
    verbose: bool,
}

impl ProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn report(&self, event: &IndexEvent) {
        match event {
            IndexEvent::BatchStarted { .. } => {
                eprint!("\r{:<60}", format!("Embedding {}", event));
                io::stderr().flush().ok();
            }
            IndexEvent::BatchCompleted { number, total } if number == total => {
                eprintln!("\rEmbedded {} batch(es){:<40}", total, "");
            }
            IndexEvent::BatchCompleted { .. } => {}
            IndexEvent::DocumentChunked { .. } | IndexEvent::DocumentStored { .. } => {
                if self.verbose {
                    eprintln!("  {}", event);
                }
            }
            IndexEvent::Failed { completed, .. } => {
                eprintln!();
                eprintln!("{}", event);
                for path in completed {
                    eprintln!("  completed: {}", path);
                }
            }
            _ => eprintln!("{}", event),
        }
    }
}
