//! Page context detection and location change subscriptions
//!
//! Gmail is a single-page app: opening a thread only changes the URL
//! fragment. The sidebar is rebuilt for the new context on every change.

use reqwest::Url;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::constants::MAIL_HOST;

/// What the mail UI is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageContext {
    /// A single thread is open (`#inbox/<thread id>`).
    Thread,
    /// Anything else: the inbox list, search, compose.
    Inbox,
}

impl PageContext {
    pub fn detect(url: &str) -> Self {
        let fragment = match Url::parse(url) {
            Ok(url) => url.fragment().map(str::to_string),
            Err(_) => url.split_once('#').map(|(_, f)| f.to_string()),
        };
        let is_thread = fragment
            .as_deref()
            .and_then(|f| f.strip_prefix("inbox/"))
            .is_some_and(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()));
        if is_thread {
            PageContext::Thread
        } else {
            PageContext::Inbox
        }
    }

    pub fn has_thread_tools(&self) -> bool {
        matches!(self, PageContext::Thread)
    }
}

/// Whether the URL belongs to the webmail UI.
pub fn is_mail_host(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.ends_with(MAIL_HOST)))
        .unwrap_or(false)
}

/// Current page location, observable by subscribers.
pub struct LocationWatcher {
    tx: watch::Sender<String>,
}

impl LocationWatcher {
    pub fn new(initial: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(initial.into());
        Self { tx }
    }

    /// Record a navigation. Subscribers only hear about actual changes.
    pub fn navigate(&self, url: impl Into<String>) -> bool {
        let url = url.into();
        self.tx.send_if_modified(|current| {
            if *current == url {
                false
            } else {
                *current = url;
                true
            }
        })
    }

    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Call `on_change` with the new context and URL after each navigation.
    ///
    /// Delivery stops when the returned [`Subscription`] is unsubscribed or
    /// dropped, or when the watcher itself is dropped.
    pub fn subscribe<F>(&self, mut on_change: F) -> Subscription
    where
        F: FnMut(PageContext, &str) + Send + 'static,
    {
        let mut rx = self.tx.subscribe();
        let handle = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let url = rx.borrow_and_update().clone();
                tracing::debug!("Location changed to {}", url);
                on_change(PageContext::detect(&url), &url);
            }
        });
        Subscription {
            handle: Some(handle),
        }
    }
}

/// Live location subscription. Dropping it also unsubscribes.
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.stop();
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}
