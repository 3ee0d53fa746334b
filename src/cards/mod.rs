//! Card system: definitions, instances, and the catalog.
//!
//! - `CardDefinition`: Static card data (category, element, power, conditions)
//! - `Card`: One copy of a card inside a session
//! - `CardCatalog`: Lookup of definitions and the default pool

pub mod definition;
pub mod instance;
pub mod catalog;

pub use definition::{
    CardCategory, CardDefinition, CardId, GenerationRule, GenerationTrigger, Rarity,
};
pub use instance::Card;
pub use catalog::CardCatalog;
