//! 追踪器状态快照
//!
//! 每次状态迁移都会整体替换快照，观察者拿到的永远是完整、一致的一份。

use serde::Serialize;

/// 渲染用的阶段投影（由三元组推导，不单独存储）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TrackerPhase {
    Idle,
    Loading,
    Success,
    Failure,
}

fn phase_of(has_data: bool, loading: bool, has_error: bool) -> TrackerPhase {
    if loading {
        TrackerPhase::Loading
    } else if has_error {
        TrackerPhase::Failure
    } else if has_data {
        TrackerPhase::Success
    } else {
        TrackerPhase::Idle
    }
}

/// 单次请求状态：`{data, loading, error}`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OperationState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> OperationState<T> {
    pub fn phase(&self) -> TrackerPhase {
        phase_of(self.data.is_some(), self.loading, self.error.is_some())
    }
}

/// 分页状态：在三元组之上增加页码信息；`has_more == page < total_pages`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaginatedState<T> {
    pub data: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub has_more: bool,
}

impl<T> Default for PaginatedState<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            loading: false,
            error: None,
            page: 1,
            total_pages: 1,
            total: 0,
            has_more: false,
        }
    }
}

impl<T> PaginatedState<T> {
    pub fn phase(&self) -> TrackerPhase {
        phase_of(!self.data.is_empty(), self.loading, self.error.is_some())
    }

    /// 已加载条数
    pub fn loaded(&self) -> usize {
        self.data.len()
    }
}

/// 表单状态：校验错误与网络错误分两路
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    /// 非空表示本次提交未发起网络请求
    pub validation_error: Option<String>,
}

impl<T> Default for FormState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            validation_error: None,
        }
    }
}

impl<T> FormState<T> {
    pub fn phase(&self) -> TrackerPhase {
        phase_of(self.data.is_some(), self.loading, self.error.is_some())
    }

    pub fn is_invalid(&self) -> bool {
        self.validation_error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_states() {
        let op = OperationState::<u32>::default();
        assert_eq!(op.data, None);
        assert!(!op.loading);
        assert_eq!(op.error, None);
        assert_eq!(op.phase(), TrackerPhase::Idle);

        let page = PaginatedState::<u32>::default();
        assert!(page.data.is_empty());
        assert_eq!((page.page, page.total_pages, page.total), (1, 1, 0));
        assert!(!page.has_more);

        let form = FormState::<u32>::default();
        assert!(!form.is_invalid());
        assert_eq!(form.phase(), TrackerPhase::Idle);
    }

    #[test]
    fn test_phase_projection() {
        let loading = OperationState::<u32> {
            data: Some(1),
            loading: true,
            error: None,
        };
        assert_eq!(loading.phase(), TrackerPhase::Loading);

        let failed = OperationState::<u32> {
            data: None,
            loading: false,
            error: Some("boom".into()),
        };
        assert_eq!(failed.phase(), TrackerPhase::Failure);

        let done = OperationState {
            data: Some(2u32),
            loading: false,
            error: None,
        };
        assert_eq!(done.phase(), TrackerPhase::Success);
    }
}
