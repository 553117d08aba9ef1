//! Cart state container.
//!
//! Tracks an in-progress order before handoff to the hosted checkout. The
//! remote cart is the system of record: local lines are a cache that is
//! rebuilt from the backend on [`CartContainer::refresh`], and local edits
//! are applied only after the matching remote write succeeds.

use std::future::Future;

use artificial_wearables_core::api::{CartView, CheckoutSession, ProductSummary};
use artificial_wearables_core::{CartId, CartLine, CartLines, CurrencyCode, Price, VariantId};

use crate::error::ClientError;
use crate::store::CartIdStore;

/// Remote cart operations the container depends on.
pub trait CartBackend {
    /// Create a remote cart seeded with one variant. Returns its identifier.
    fn create_cart(
        &self,
        variant_id: &VariantId,
        quantity: u32,
    ) -> impl Future<Output = Result<CartId, ClientError>> + Send;

    /// Fetch a remote cart. A missing cart is [`ClientError::NotFound`].
    fn fetch_cart(
        &self,
        cart_id: &CartId,
    ) -> impl Future<Output = Result<CartView, ClientError>> + Send;

    /// Add units of a variant to a remote cart.
    fn add_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Set the quantity of a variant in a remote cart.
    fn update_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Remove a variant from a remote cart.
    fn remove_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Create a checkout session for a remote cart.
    fn checkout(
        &self,
        cart_id: &CartId,
    ) -> impl Future<Output = Result<CheckoutSession, ClientError>> + Send;
}

/// Client-held cart: identifier, cached lines, and the last failure.
#[derive(Debug)]
pub struct CartContainer<B, S> {
    backend: B,
    store: S,
    cart_id: Option<CartId>,
    lines: CartLines,
    currency: CurrencyCode,
    last_error: Option<String>,
}

impl<B: CartBackend, S: CartIdStore> CartContainer<B, S> {
    /// Create an empty container. Call [`restore`](Self::restore) to pick up
    /// a previously persisted cart.
    pub fn new(backend: B, store: S) -> Self {
        Self {
            backend,
            store,
            cart_id: None,
            lines: CartLines::new(),
            currency: CurrencyCode::default(),
            last_error: None,
        }
    }

    /// The backend, for calls outside the cart (e.g., catalog reads).
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The identifier store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Identifier of the current remote cart, if one exists.
    pub const fn cart_id(&self) -> Option<&CartId> {
        self.cart_id.as_ref()
    }

    /// Cached line items.
    pub const fn lines(&self) -> &CartLines {
        &self.lines
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.item_count()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Price {
        self.lines.subtotal(self.currency)
    }

    /// Message of the most recent failed operation, cleared on success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Load the persisted cart identifier and fetch its cart.
    ///
    /// A cart the storefront no longer knows is forgotten. Any other failure
    /// keeps the identifier so a later [`refresh`](Self::refresh) can retry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the fetch fails for a
    /// reason other than "not found".
    pub async fn restore(&mut self) -> Result<(), ClientError> {
        let result = self.try_restore().await;
        self.record("restore", result)
    }

    async fn try_restore(&mut self) -> Result<(), ClientError> {
        let Some(cart_id) = self.store.load()? else {
            return Ok(());
        };
        self.cart_id = Some(cart_id.clone());

        match self.backend.fetch_cart(&cart_id).await {
            Ok(view) => {
                self.apply(view);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::info!(cart_id = %cart_id, "Saved cart no longer exists, forgetting it");
                self.reset();
                self.store.clear()?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Rebuild local lines from the remote cart.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NoCart`] without a cart, or the fetch error.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let result = self.try_refresh().await;
        self.record("refresh", result)
    }

    async fn try_refresh(&mut self) -> Result<(), ClientError> {
        let cart_id = self.require_cart()?;
        let view = self.backend.fetch_cart(&cart_id).await?;
        self.apply(view);
        Ok(())
    }

    /// Add units of a product variant.
    ///
    /// Without a cart, a remote cart seeded with this item is created, its
    /// identifier persisted, and the lines refetched. Otherwise the item is
    /// appended remotely and then merged locally. A cart that no longer
    /// exists upstream is forgotten and replaced by a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if any remote call or the identifier store fails.
    pub async fn add_item(
        &mut self,
        product: &ProductSummary,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        let result = self.try_add_item(product, variant_id, quantity).await;
        self.record("add_item", result)
    }

    async fn try_add_item(
        &mut self,
        product: &ProductSummary,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        let quantity = quantity.max(1);

        let Some(cart_id) = self.cart_id.clone() else {
            return self.create_with(variant_id, quantity).await;
        };

        match self.backend.add_item(&cart_id, variant_id, quantity).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::info!(cart_id = %cart_id, "Cart expired, starting a new one");
                self.reset();
                self.store.clear()?;
                return self.create_with(variant_id, quantity).await;
            }
            Err(e) => return Err(e),
        }

        self.lines.merge(CartLine {
            variant_id: variant_id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            currency: product.currency,
            quantity,
            image_url: product.image_url.clone(),
            product_slug: Some(product.slug.clone()),
        });
        Ok(())
    }

    /// Create a remote cart seeded with one item, persist its identifier, and
    /// load its lines.
    async fn create_with(&mut self, variant_id: &VariantId, quantity: u32) -> Result<(), ClientError> {
        let cart_id = self.backend.create_cart(variant_id, quantity).await?;
        tracing::info!(cart_id = %cart_id, "Created cart");
        self.cart_id = Some(cart_id.clone());
        self.store.save(&cart_id)?;
        self.try_refresh().await
    }

    /// Set a line's quantity. Quantities below 1 are raised to 1; use
    /// [`remove_item`](Self::remove_item) to drop a line.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NoCart`] without a cart, or the remote error.
    pub async fn update_quantity(
        &mut self,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        let result = self.try_update_quantity(variant_id, quantity).await;
        self.record("update_quantity", result)
    }

    async fn try_update_quantity(
        &mut self,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        let cart_id = self.require_cart()?;
        let quantity = quantity.max(1);

        self.backend
            .update_item(&cart_id, variant_id, quantity)
            .await?;
        if !self.lines.set_quantity(variant_id, quantity) {
            tracing::debug!(variant_id = %variant_id, "Updated variant not in local cart");
        }
        Ok(())
    }

    /// Remove a variant's line.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NoCart`] without a cart, or the remote error.
    pub async fn remove_item(&mut self, variant_id: &VariantId) -> Result<(), ClientError> {
        let result = self.try_remove_item(variant_id).await;
        self.record("remove_item", result)
    }

    async fn try_remove_item(&mut self, variant_id: &VariantId) -> Result<(), ClientError> {
        let cart_id = self.require_cart()?;
        self.backend.remove_item(&cart_id, variant_id).await?;
        self.lines.remove(variant_id);
        Ok(())
    }

    /// Refetch the cart and return a checkout redirect URL for it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NoCart`] without a cart,
    /// [`ClientError::CartEmpty`] if the refetched cart has no items, or the
    /// remote error.
    pub async fn checkout_url(&mut self) -> Result<String, ClientError> {
        let result = self.try_checkout_url().await;
        self.record("checkout_url", result)
    }

    async fn try_checkout_url(&mut self) -> Result<String, ClientError> {
        self.try_refresh().await?;
        if self.lines.is_empty() {
            return Err(ClientError::CartEmpty);
        }

        let cart_id = self.require_cart()?;
        let session = self.backend.checkout(&cart_id).await?;
        tracing::info!(cart_id = %cart_id, expires_at = %session.expires_at, "Checkout session created");
        Ok(session.redirect_url)
    }

    /// Drop the cart: empty the lines and forget the persisted identifier.
    ///
    /// The remote cart is left alone; Fourthwall expires it.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier store cannot be cleared. In-memory
    /// state is reset regardless.
    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.reset();
        let result = self.store.clear().map_err(ClientError::from);
        self.record("clear", result)
    }

    fn require_cart(&self) -> Result<CartId, ClientError> {
        self.cart_id.clone().ok_or(ClientError::NoCart)
    }

    fn apply(&mut self, view: CartView) {
        self.cart_id = Some(view.id);
        self.currency = view.currency;
        self.lines = CartLines::from(view.items);
    }

    fn reset(&mut self) {
        self.cart_id = None;
        self.lines.clear();
    }

    /// Track the outcome of an operation in the error flag.
    fn record<T>(&mut self, operation: &str, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                tracing::error!(operation, error = %e, "Cart operation failed");
                self.last_error = Some(e.to_string());
            }
        }
        result
    }
}
