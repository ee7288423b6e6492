//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart lives in the session's slots; every mutation is committed back
//! before the response is sent and announces itself with `HX-Trigger`.

use std::convert::Infallible;

use axum::{
    Form,
    extract::State,
    response::{
        AppendHeaders, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use shopease_core::{LineItem, Price, ProductId, Quantity};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{SessionCart, actions, session::badge_key};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::views::{CartContentsTemplate, CartCountTemplate, CartShowTemplate, CartView};

/// HTMX event fired after every cart mutation.
pub const CART_UPDATED: &str = "cart-updated";

/// SSE event name carrying the badge count.
pub const BADGE_EVENT: &str = "badge";

/// Open the request's cart.
pub(crate) async fn open_cart(state: &AppState, session: Session) -> Result<SessionCart> {
    Ok(SessionCart::open(session, state.slot_layout(), state.badges()).await?)
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub price: String,
    pub quantity: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    #[serde(default)]
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

fn parse_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn contents(cart: &SessionCart, state: &AppState) -> CartContentsTemplate {
    CartContentsTemplate {
        cart: CartView::build(&cart.store().load(), state.shipping()),
    }
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    let cart = open_cart(&state, session).await?;
    let view = CartView::build(&cart.store().load(), state.shipping());
    Ok(CartShowTemplate {
        badge_count: view.item_count,
        cart: view,
    })
}

/// Add item to cart (HTMX).
///
/// Merges with an existing line for the same product. Returns the new
/// badge count with an HTMX trigger so other fragments refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = parse_id(&form.id)?;
    let price = Price::parse(&form.price).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let qty = form
        .quantity
        .as_deref()
        .map_or(Quantity::ONE, Quantity::parse_clamped);
    let name = match form.name.trim() {
        "" => id.to_string(),
        name => name.to_string(),
    };

    let mut cart = open_cart(&state, session).await?;
    actions::add_item(cart.store_mut(), LineItem::new(id.clone(), name, price, qty))?;
    cart.commit().await?;

    let count = cart.store().item_count();
    add_breadcrumb(
        "cart",
        "Item added",
        &[("id", id.as_ref()), ("count", &count.to_string())],
    );

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED)]),
        CartCountTemplate { count },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
///
/// Quantities below one are clamped to one. An unknown product leaves the
/// cart untouched.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let id = parse_id(&form.id)?;
    let mut cart = open_cart(&state, session).await?;

    if !actions::update_quantity(cart.store_mut(), &id, &form.quantity)? {
        tracing::debug!(%id, "Quantity update for product not in cart");
        return Ok(contents(&cart, &state).into_response());
    }
    cart.commit().await?;

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED)]),
        contents(&cart, &state),
    )
        .into_response())
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let id = parse_id(&form.id)?;
    let mut cart = open_cart(&state, session).await?;

    if !actions::remove_item(cart.store_mut(), &id)? {
        return Ok(contents(&cart, &state).into_response());
    }
    cart.commit().await?;

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED)]),
        contents(&cart, &state),
    )
        .into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let cart = open_cart(&state, session).await?;
    Ok(CartCountTemplate {
        count: cart.store().item_count(),
    })
}

/// Stream badge counts written by the session's other tabs.
///
/// A session without an id has never stored a cart, so there is nothing to
/// follow; the stream only sends keep-alives.
#[instrument(skip(state, session))]
pub async fn events(
    State(state): State<AppState>,
    session: Session,
) -> Sse<impl futures::Stream<Item = std::result::Result<Event, Infallible>>> {
    let counts = match badge_key(&session) {
        Some(key) => state.badges().updates_for(key).boxed(),
        None => stream::empty::<u64>().boxed(),
    };

    let events =
        counts.map(|count| Ok(Event::default().event(BADGE_EVENT).data(count.to_string())));

    Sse::new(events).keep_alive(KeepAlive::default())
}
