use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("Numeric overflow while computing {quantity}")]
    Overflow {
        quantity: &'static str
    }
}

impl AggregateError {
    pub fn overflow(quantity: &'static str) -> Self {
        Self::Overflow { quantity }
    }
}
