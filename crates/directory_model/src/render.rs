use serde::Serialize;

/// View state shared by the directory, detail and admin list views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum RenderState<T> {
    Loading,
    Error(String),
    /// Loading completed but there is nothing to show.
    Empty,
    Ready(T),
}

impl<T> RenderState<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RenderState<U> {
        match self {
            Self::Loading => RenderState::Loading,
            Self::Error(message) => RenderState::Error(message),
            Self::Empty => RenderState::Empty,
            Self::Ready(data) => RenderState::Ready(f(data)),
        }
    }

    pub fn as_ref(&self) -> RenderState<&T> {
        match self {
            Self::Loading => RenderState::Loading,
            Self::Error(message) => RenderState::Error(message.clone()),
            Self::Empty => RenderState::Empty,
            Self::Ready(data) => RenderState::Ready(data),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_with_state_tag() {
        let ready: RenderState<Vec<u8>> = RenderState::Ready(vec![1]);
        assert_eq!(
            serde_json::to_value(&ready).unwrap(),
            serde_json::json!({"state": "ready", "data": [1]})
        );
        let error: RenderState<()> = RenderState::Error("Failed".to_string());
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            serde_json::json!({"state": "error", "data": "Failed"})
        );
        let loading: RenderState<()> = RenderState::Loading;
        assert_eq!(
            serde_json::to_value(&loading).unwrap(),
            serde_json::json!({"state": "loading"})
        );
    }

    #[test]
    fn map_keeps_non_ready_states() {
        let state: RenderState<u8> = RenderState::Empty;
        assert_eq!(state.map(|v| v + 1), RenderState::Empty);
        assert_eq!(RenderState::Ready(1).map(|v| v + 1), RenderState::Ready(2));
    }
}
