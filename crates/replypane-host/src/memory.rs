//! An in-process host.
//!
//! [`MemoryItem`] keeps its body in memory and answers callbacks
//! synchronously. It backs [`EmlMailHost`](crate::EmlMailHost) and lets
//! tests script host failures (failed reads or writes, dropped callbacks).

use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use replypane_types::Mailbox;

use crate::item::{AsyncResult, Callback, CoercionType, ItemMode, ItemType, MailHost, MailboxItem};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct BodyState {
    body: String,
    /// Selected char range; empty means a cursor at `start`.
    selection: Range<usize>,
}

/// A mailbox item held entirely in memory.
#[derive(Debug)]
pub struct MemoryItem {
    subject: String,
    item_type: ItemType,
    mode: ItemMode,
    from: Option<Mailbox>,
    to: Vec<Mailbox>,
    attachments: Vec<String>,
    created: Option<DateTime<Utc>>,
    state: Mutex<BodyState>,
    read_failure: Mutex<Option<String>>,
    write_failure: Mutex<Option<String>>,
    drop_callbacks: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryItem {
    /// A received message in read mode, cursor at the start of the body.
    pub fn message(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            item_type: ItemType::Message,
            mode: ItemMode::Read,
            from: None,
            to: Vec::new(),
            attachments: Vec::new(),
            created: None,
            state: Mutex::new(BodyState {
                body: body.into(),
                selection: 0..0,
            }),
            read_failure: Mutex::new(None),
            write_failure: Mutex::new(None),
            drop_callbacks: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn in_compose_mode(mut self) -> Self {
        self.mode = ItemMode::Compose;
        self
    }

    pub fn as_appointment(mut self) -> Self {
        self.item_type = ItemType::Appointment;
        self
    }

    pub fn with_sender(mut self, from: Mailbox) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_recipients(mut self, to: Vec<Mailbox>) -> Self {
        self.to = to;
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Select a char range of the body. Clamped to the body length.
    pub fn with_selection(self, selection: Range<usize>) -> Self {
        {
            let mut state = lock(&self.state);
            let len = state.body.chars().count();
            let start = selection.start.min(len);
            let end = selection.end.clamp(start, len);
            state.selection = start..end;
        }
        self
    }

    /// Current body text.
    pub fn body(&self) -> String {
        lock(&self.state).body.clone()
    }

    /// Make subsequent body reads fail with `message` (`None` to recover).
    pub fn fail_reads(&self, message: Option<String>) {
        *lock(&self.read_failure) = message;
    }

    /// Make subsequent body writes fail with `message` (`None` to recover).
    pub fn fail_writes(&self, message: Option<String>) {
        *lock(&self.write_failure) = message;
    }

    /// Drop callbacks without invoking them, like a host that never answers.
    pub fn drop_callbacks(&self, drop: bool) {
        self.drop_callbacks.store(drop, Ordering::SeqCst);
    }

    /// Body reads attempted so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Body writes attempted so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn complete_write(&self, callback: Callback<()>, apply: impl FnOnce(&mut BodyState)) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.drop_callbacks.load(Ordering::SeqCst) {
            return;
        }
        if let Some(message) = lock(&self.write_failure).clone() {
            callback(AsyncResult::failed(Some(message)));
            return;
        }
        apply(&mut lock(&self.state));
        callback(AsyncResult::succeeded(()));
    }
}

fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(idx, _)| idx)
}

impl MailboxItem for MemoryItem {
    fn subject(&self) -> String {
        self.subject.clone()
    }

    fn item_type(&self) -> ItemType {
        self.item_type
    }

    fn mode(&self) -> ItemMode {
        self.mode
    }

    fn from(&self) -> Option<Mailbox> {
        self.from.clone()
    }

    fn to(&self) -> Vec<Mailbox> {
        self.to.clone()
    }

    fn attachments(&self) -> Vec<String> {
        self.attachments.clone()
    }

    fn date_time_created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    fn body_get_async(&self, _coercion: CoercionType, callback: Callback<String>) {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.drop_callbacks.load(Ordering::SeqCst) {
            return;
        }
        if let Some(message) = lock(&self.read_failure).clone() {
            callback(AsyncResult::failed(Some(message)));
            return;
        }
        callback(AsyncResult::succeeded(self.body()));
    }

    fn body_set_async(&self, data: String, _coercion: CoercionType, callback: Callback<()>) {
        self.complete_write(callback, |state| {
            state.body = data;
            state.selection = 0..0;
        });
    }

    fn body_prepend_async(&self, data: String, _coercion: CoercionType, callback: Callback<()>) {
        self.complete_write(callback, |state| {
            let shift = data.chars().count();
            state.body.insert_str(0, &data);
            state.selection = state.selection.start + shift..state.selection.end + shift;
        });
    }

    fn body_set_selected_data_async(
        &self,
        data: String,
        _coercion: CoercionType,
        callback: Callback<()>,
    ) {
        self.complete_write(callback, |state| {
            let start = byte_offset(&state.body, state.selection.start);
            let end = byte_offset(&state.body, state.selection.end);
            state.body.replace_range(start..end, &data);
            let cursor = state.selection.start + data.chars().count();
            state.selection = cursor..cursor;
        });
    }
}

/// A host whose open item can be swapped or closed at runtime.
#[derive(Debug, Default)]
pub struct MemoryMailHost {
    item: Mutex<Option<Arc<MemoryItem>>>,
}

impl MemoryMailHost {
    pub fn new(item: MemoryItem) -> Self {
        Self::from_shared(Arc::new(item))
    }

    pub fn from_shared(item: Arc<MemoryItem>) -> Self {
        Self {
            item: Mutex::new(Some(item)),
        }
    }

    /// A host with nothing open.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn item(&self) -> Option<Arc<MemoryItem>> {
        lock(&self.item).clone()
    }

    pub fn set_item(&self, item: MemoryItem) {
        *lock(&self.item) = Some(Arc::new(item));
    }

    /// Close the open item.
    pub fn clear(&self) {
        *lock(&self.item) = None;
    }
}

impl MailHost for MemoryMailHost {
    fn current_item(&self) -> Option<Arc<dyn MailboxItem>> {
        self.item().map(|item| item as Arc<dyn MailboxItem>)
    }
}
