//! Integration tests for Poom Store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p poom-store-integration-tests
//! ```
//!
//! Tests drive the storefront library against [`MockBackend`], an in-process
//! axum server standing in for the product and order API. It binds an
//! ephemeral port, so tests can run in parallel.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use poom_store_core::UserId;
use poom_store_storefront::Storefront;
use poom_store_storefront::api::StoreApiClient;
use serde_json::Value;
use tokio::task::JoinHandle;
use url::Url;

/// A canned HTTP response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    /// 200 with a JSON body.
    #[must_use]
    pub fn json(value: &Value) -> Self {
        Self {
            status: 200,
            body: value.to_string(),
        }
    }

    /// Any status with a raw body.
    #[must_use]
    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    fn to_response(&self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body.clone(),
        )
            .into_response()
    }
}

struct MockState {
    products: Mutex<Reply>,
    orders: Mutex<Reply>,
    product_requests: AtomicUsize,
    received_orders: Mutex<Vec<Value>>,
}

/// In-process stand-in for the store API.
///
/// Serves `GET /api/products` and `POST /api/orders` with configurable
/// replies and records every order body it receives. The server task is
/// aborted on drop.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Start a backend on `127.0.0.1` with the given replies.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(products: Reply, orders: Reply) -> Self {
        let state = Arc::new(MockState {
            products: Mutex::new(products),
            orders: Mutex::new(orders),
            product_requests: AtomicUsize::new(0),
            received_orders: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/products", get(list_products))
            .route("/api/orders", post(create_order))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener
            .local_addr()
            .expect("Mock backend has no local address");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL of the backend, ending in `/`.
    ///
    /// # Panics
    ///
    /// Never in practice: a socket address always forms a valid URL.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("Socket address is a valid URL")
    }

    /// A client pointed at this backend.
    #[must_use]
    pub fn client(&self) -> StoreApiClient {
        StoreApiClient::with_base_url(self.url())
    }

    /// A fresh storefront session ordering as `user_id`.
    #[must_use]
    pub fn storefront(&self, user_id: i64) -> Storefront {
        Storefront::new(self.client(), UserId::new(user_id))
    }

    /// Change the reply for subsequent order requests.
    pub fn set_orders_reply(&self, reply: Reply) {
        *self
            .state
            .orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = reply;
    }

    /// Number of catalog requests served so far.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.state.product_requests.load(Ordering::SeqCst)
    }

    /// Every order body received so far, in arrival order.
    #[must_use]
    pub fn received_orders(&self) -> Vec<Value> {
        self.state
            .received_orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn list_products(State(state): State<Arc<MockState>>) -> Response {
    state.product_requests.fetch_add(1, Ordering::SeqCst);
    state
        .products
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .to_response()
}

async fn create_order(State(state): State<Arc<MockState>>, body: String) -> Response {
    let value = serde_json::from_str(&body).unwrap_or(Value::Null);
    state
        .received_orders
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(value);
    state
        .orders
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .to_response()
}
