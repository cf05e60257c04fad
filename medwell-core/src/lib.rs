pub mod config;
pub mod persona;
pub mod recipe;
pub mod text;
pub mod token;

// Keep the public surface small and intentional.
pub use config::*;
pub use persona::*;
pub use recipe::{Recipe, RecipeInfo, is_recipe_response, parse_recipe};
pub use token::*;
