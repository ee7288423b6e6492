//! Checkout route handlers.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shopease_core::{Cart, CheckoutForm};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::routes::cart::open_cart;
use crate::services::{Checkout, SubmitOutcome};
use crate::state::AppState;
use crate::views::{CheckoutFormView, CheckoutShowTemplate, CheckoutSummaryView};

/// Display the order summary and the payment form.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CheckoutShowTemplate> {
    let cart = open_cart(&state, session).await?;
    let items = cart.store().load();
    Ok(CheckoutShowTemplate {
        summary: CheckoutSummaryView::build(&items, state.shipping()),
        form: CheckoutFormView::editing(),
        badge_count: items.total_quantity(),
    })
}

/// Place the order.
///
/// An invalid form is re-rendered with status 422, keeping the entered
/// values and the cart. A valid one empties the cart and shows the
/// confirmation.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart = open_cart(&state, session).await?;
    let mut checkout = Checkout::new();

    match checkout.submit(&form, cart.store_mut(), state.shipping())? {
        SubmitOutcome::Placed(receipt) => {
            cart.commit().await?;
            add_breadcrumb(
                "checkout",
                "Order placed",
                &[
                    ("items", &receipt.items.to_string()),
                    ("total", &receipt.totals.total.to_string()),
                ],
            );

            Ok(CheckoutShowTemplate {
                summary: CheckoutSummaryView::build(&Cart::new(), state.shipping()),
                form: CheckoutFormView::for_phase(checkout.phase(), &form),
                badge_count: 0,
            }
            .into_response())
        }
        SubmitOutcome::Rejected(_) => {
            let items = cart.store().load();
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutShowTemplate {
                    summary: CheckoutSummaryView::build(&items, state.shipping()),
                    form: CheckoutFormView::for_phase(checkout.phase(), &form),
                    badge_count: items.total_quantity(),
                },
            )
                .into_response())
        }
    }
}
