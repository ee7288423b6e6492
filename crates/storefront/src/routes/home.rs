//! Home page route handler.

use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::routes::cart::open_cart;
use crate::state::AppState;
use crate::views::HomeTemplate;

/// Display the home page with the demo catalog.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<HomeTemplate> {
    let cart = open_cart(&state, session).await?;
    Ok(HomeTemplate::new(cart.store().item_count()))
}
