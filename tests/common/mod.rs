#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, stream};
use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};
use tokio::net::TcpListener;

use photo_portfolio::{
    app,
    config::ManifestConfig,
    models::object::{ObjectBody, ObjectSummary},
    services::{
        object_store::{PhotoStore, StoreError, StoreResult},
        portfolio_service::PortfolioService,
    },
};

pub const BUCKET: &str = "ns-portfolio-photos";
pub const PUBLIC_URL: &str = "https://photos.example.com";

#[derive(Clone)]
struct StoredObject {
    key: String,
    body: Bytes,
    content_type: Option<String>,
}

/// In-memory bucket standing in for R2.
#[derive(Clone, Default)]
pub struct FakeStore {
    objects: Arc<Mutex<Vec<StoredObject>>>,
    failing: Arc<AtomicBool>,
    list_calls: Arc<AtomicUsize>,
}

impl FakeStore {
    pub fn with_keys(keys: &[&str]) -> Self {
        let store = Self::default();
        for key in keys {
            store.put(key, format!("bytes of {key}").into_bytes(), None);
        }
        store
    }

    pub fn put(&self, key: &str, body: Vec<u8>, content_type: Option<&str>) {
        self.objects.lock().unwrap().push(StoredObject {
            key: key.to_string(),
            body: Bytes::from(body),
            content_type: content_type.map(str::to_string),
        });
    }

    /// Make every subsequent call fail as if the store were unreachable.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_up(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Upstream("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PhotoStore for FakeStore {
    async fn list_objects(&self, max_keys: usize) -> StoreResult<Vec<ObjectSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_up()?;
        let mut objects: Vec<ObjectSummary> = self
            .objects
            .lock()
            .unwrap()
            .iter()
            .map(|o| ObjectSummary::new(o.key.clone(), o.body.len() as u64))
            .collect();
        objects.sort_by(|a, b| a.key.cmp(&b.key));
        objects.truncate(max_keys);
        Ok(objects)
    }

    async fn get_object(&self, key: &str) -> StoreResult<ObjectBody> {
        self.check_up()?;
        let found = self
            .objects
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.key == key)
            .cloned();
        let object = found.ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        let length = object.body.len() as u64;
        let body = object.body;
        Ok(ObjectBody {
            content_type: object.content_type,
            content_length: Some(length),
            stream: stream::once(async move { Ok(body) }).boxed(),
        })
    }
}

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: FakeStore,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Service over `store` with the given settings.
pub fn service_with(store: &FakeStore, cfg: &ManifestConfig) -> PortfolioService {
    PortfolioService::new(Arc::new(store.clone()), BUCKET, PUBLIC_URL, cfg)
}

pub async fn spawn_server(store: FakeStore) -> TestServer {
    let service = service_with(&store, &ManifestConfig::default());
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app(service))
            .await
            .expect("server error");
    });

    TestServer {
        addr,
        store,
        client: reqwest::Client::new(),
    }
}
