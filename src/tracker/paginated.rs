//! 分页追踪器
//!
//! execute(executor, page, size, append)：append 为 true 时把新一页接在已有数据尾部，
//! 否则整体替换。load_more 在 `has_more && !loading` 时请求下一页，
//! 判断与进入 Loading 在同一步完成，连续触发只会发出一次请求。

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::failure::{normalize_error, FailureMessage};
use super::generation::Generation;
use super::options::TrackerOptions;
use super::state::PaginatedState;

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// 分页执行器的返回值；`data` 作为 `items` 的兼容别名
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    #[serde(alias = "data")]
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub pages: u32,
}

impl<T> PageResult<T> {
    /// 按 (page, size) 从完整列表中切出一页，页码从 1 开始
    pub fn slice(all: &[T], page: u32, size: u32) -> Self
    where
        T: Clone,
    {
        let size = size.max(1) as usize;
        let total = all.len();
        let pages = total.div_ceil(size).max(1) as u32;
        let start = (page.max(1) as usize - 1).saturating_mul(size).min(total);
        let end = (start + size).min(total);
        Self {
            items: all[start..end].to_vec(),
            total: total as u64,
            page: page.max(1),
            pages,
        }
    }
}

/// 追踪分页列表的加载、追加与页码
pub struct PaginatedTracker<T> {
    state: watch::Sender<PaginatedState<T>>,
    generation: Generation,
    options: TrackerOptions<PageResult<T>>,
}

impl<T: Clone> PaginatedTracker<T> {
    pub fn new() -> Self {
        Self::with_options(TrackerOptions::default())
    }

    pub fn with_options(options: TrackerOptions<PageResult<T>>) -> Self {
        let (state, _) = watch::channel(PaginatedState::default());
        Self {
            state,
            generation: Generation::default(),
            options,
        }
    }

    pub fn state(&self) -> PaginatedState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PaginatedState<T>> {
        self.state.subscribe()
    }

    /// 加载第一页（替换模式，默认页大小）
    pub async fn load_first<F, Fut, E>(&self, executor: F) -> Result<PageResult<T>, E>
    where
        F: FnOnce(u32, u32) -> Fut,
        Fut: Future<Output = Result<PageResult<T>, E>>,
        E: FailureMessage,
    {
        self.execute(executor, 1, DEFAULT_PAGE_SIZE, false).await
    }

    /// 请求指定页。进入 Loading 时不清空 data，失败时 data 保持不变。
    pub async fn execute<F, Fut, E>(
        &self,
        executor: F,
        page: u32,
        size: u32,
        append: bool,
    ) -> Result<PageResult<T>, E>
    where
        F: FnOnce(u32, u32) -> Fut,
        Fut: Future<Output = Result<PageResult<T>, E>>,
        E: FailureMessage,
    {
        let mut generation = 0;
        self.state.send_modify(|s| {
            generation = self.generation.advance();
            s.loading = true;
            s.error = None;
        });
        self.run(generation, executor, page, size, append).await
    }

    /// 加载下一页并追加。没有更多数据或已在加载时直接返回 `Ok(None)`。
    pub async fn load_more<F, Fut, E>(
        &self,
        executor: F,
        size: u32,
    ) -> Result<Option<PageResult<T>>, E>
    where
        F: FnOnce(u32, u32) -> Fut,
        Fut: Future<Output = Result<PageResult<T>, E>>,
        E: FailureMessage,
    {
        let mut claimed = None;
        self.state.send_if_modified(|s| {
            if !s.has_more || s.loading {
                return false;
            }
            claimed = Some((self.generation.advance(), s.page + 1));
            s.loading = true;
            s.error = None;
            true
        });

        let Some((generation, page)) = claimed else {
            tracing::debug!("load_more skipped: nothing more to load or already loading");
            return Ok(None);
        };
        self.run(generation, executor, page, size, true).await.map(Some)
    }

    /// 回到初始状态；进行中的调用随之作废
    pub fn reset(&self) {
        self.state.send_modify(|s| {
            self.generation.advance();
            *s = PaginatedState::default();
        });
        tracing::debug!("paginated tracker reset");
    }

    async fn run<F, Fut, E>(
        &self,
        generation: u64,
        executor: F,
        page: u32,
        size: u32,
        append: bool,
    ) -> Result<PageResult<T>, E>
    where
        F: FnOnce(u32, u32) -> Fut,
        Fut: Future<Output = Result<PageResult<T>, E>>,
        E: FailureMessage,
    {
        tracing::debug!(generation, page, size, append, "page request started");
        let outcome = executor(page, size).await;
        let settled = outcome.as_ref().map_err(|e| normalize_error(e));

        let applied = self.state.send_if_modified(|s| {
            if !self.generation.is_current(generation) {
                return false;
            }
            s.loading = false;
            match &settled {
                Ok(result) => {
                    if append {
                        s.data.extend(result.items.iter().cloned());
                    } else {
                        s.data = result.items.clone();
                    }
                    s.page = result.page.max(1);
                    s.total_pages = result.pages.max(1);
                    s.total = result.total;
                    s.has_more = s.page < s.total_pages;
                    s.error = None;
                }
                Err(message) => s.error = Some(message.clone()),
            }
            true
        });
        if !applied {
            tracing::warn!(generation, page, "discarding stale page result");
            return outcome;
        }

        match settled {
            Ok(result) => {
                tracing::debug!(
                    generation,
                    page = result.page,
                    pages = result.pages,
                    items = result.items.len(),
                    "page loaded"
                );
                self.options.notify_success(result);
            }
            Err(message) => {
                tracing::warn!(generation, page, error = %message, "page request failed");
                self.options.notify_error(&message);
            }
        }
        outcome
    }
}

impl<T: Clone> Default for PaginatedTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}
