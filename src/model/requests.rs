//! Generation tickets that let screens drop stale responses
//!
//! A screen load takes a ticket. Starting a newer load for the same screen,
//! or navigating away from it, bumps the generation; responses holding an
//! older ticket are discarded when they arrive.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::types::Screen;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub screen: Screen,
    generation: u64,
}

#[derive(Clone, Default)]
pub struct RequestTracker {
    generations: Arc<Mutex<HashMap<Screen, u64>>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load for `screen`, invalidating any load already in flight
    pub async fn begin(&self, screen: Screen) -> Ticket {
        let mut generations = self.generations.lock().await;
        let generation = generations.entry(screen).or_insert(0);
        *generation += 1;
        Ticket { screen, generation: *generation }
    }

    /// Invalidate in-flight loads without starting a new one
    pub async fn invalidate(&self, screen: Screen) {
        let mut generations = self.generations.lock().await;
        *generations.entry(screen).or_insert(0) += 1;
    }

    pub async fn is_current(&self, ticket: Ticket) -> bool {
        let generations = self.generations.lock().await;
        generations.get(&ticket.screen).copied() == Some(ticket.generation)
    }
}
