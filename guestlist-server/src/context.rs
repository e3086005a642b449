use std::sync::Arc;

use guestlist_ledger::{Database, Seating};

#[derive(Clone)]
pub struct ServerContext {
    pub seating: Arc<Seating<dyn Database>>,
}

impl ServerContext {
    pub fn new(seating: Seating<dyn Database>) -> Self {
        Self {
            seating: Arc::new(seating),
        }
    }
}
