//! Адаптер синхронизации с persistence API.
//!
//! Локальные мутации применяются немедленно и безусловно; отправка на
//! сервер — нисходящий побочный эффект, никогда не шлюз. Ошибка отправки
//! не откатывает уже видимую пользователю перестановку — она возвращается
//! вызывающему, и решение (повторить, откатить, показать) принимает он.

pub mod http;

use async_trait::async_trait;
use contracts::collection::ScopeKey;
use contracts::sync::{OrderStateDto, SaveOrderRequest};
use thiserror::Error;

pub use http::HttpOrderBackend;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("сетевая ошибка: {0}")]
    Network(String),

    #[error("сервер вернул {status}: {message}")]
    Http { status: u16, message: String },

    #[error("не удалось разобрать ответ сервера: {0}")]
    Decode(String),

    #[error("сервер отклонил состояние: {0}")]
    Rejected(String),
}

/// Подтверждение успешной отправки.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncAck {
    pub message: String,
}

// ============================================================================
// Backend boundary
// ============================================================================

/// Граница persistence API. Реализация по HTTP — [`HttpOrderBackend`];
/// в тестах подставляется двойник в памяти.
#[async_trait]
pub trait OrderBackend {
    /// Чтение сохраненного состояния при инициализации.
    /// Отсутствующая запись — `Ok(None)`, не ошибка.
    async fn pull(&self, scope: &ScopeKey) -> Result<Option<OrderStateDto>, SyncError>;

    /// Отправка текущего снимка. Ответ сервера никогда не пишется обратно
    /// в живое хранилище — иначе подтверждение затерло бы более новое
    /// оптимистичное состояние.
    async fn push(&self, request: &SaveOrderRequest) -> Result<SyncAck, SyncError>;

    /// Явный сброс расстановки.
    async fn reset(&self, scope: &ScopeKey) -> Result<(), SyncError>;
}

// ============================================================================
// Coalescing queue
// ============================================================================

/// Склеивающая очередь отправки: быстрые последовательные перестановки
/// не порождают по сетевому запросу каждая.
///
/// `enqueue` перезаписывает отложенный снимок; `flush` отправляет самый
/// свежий и повторяет, если за время запроса появился еще более новый —
/// на границе персистентности побеждает последняя запись, а не первый
/// пришедший ответ.
#[derive(Debug, Default)]
pub struct SyncQueue {
    pending: Option<SaveOrderRequest>,
    /// Ревизия последнего поставленного снимка.
    enqueued_revision: u64,
    /// Ревизия последнего подтвержденного снимка.
    pushed_revision: u64,
}

impl SyncQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Есть ли неотправленное состояние.
    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }

    /// Поставить снимок в очередь. Предыдущий отложенный снимок
    /// замещается: отправлять устаревшее состояние нет смысла.
    pub fn enqueue(&mut self, revision: u64, snapshot: SaveOrderRequest) {
        self.enqueued_revision = revision;
        self.pending = Some(snapshot);
    }

    /// Отправить все накопленное.
    ///
    /// При ошибке отложенный снимок сохраняется (повторный `flush` — это
    /// и есть явный ретрай), ошибка возвращается вызывающему, локальное
    /// состояние не трогается.
    pub async fn flush<B: OrderBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<Option<SyncAck>, SyncError> {
        let mut last_ack = None;

        while let Some(snapshot) = self.pending.clone() {
            let revision = self.enqueued_revision;
            match backend.push(&snapshot).await {
                Ok(ack) => {
                    self.pushed_revision = revision;
                    // Если за время запроса поставили более новый снимок —
                    // отправляем и его; иначе очередь чиста.
                    if self.enqueued_revision == revision {
                        self.pending = None;
                    }
                    last_ack = Some(ack);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(last_ack)
    }

    pub fn pushed_revision(&self) -> u64 {
        self.pushed_revision
    }
}
