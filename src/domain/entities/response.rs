use serde::Serialize;

/// Success envelope shared by every endpoint: `{success, count?, message?, data}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        ApiResponse {
            success: true,
            count: None,
            message: None,
            data,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        ApiResponse {
            count: Some(count),
            ..ApiResponse::data(items)
        }
    }
}

/// Serializes as `{}`.
#[derive(Debug, Default, Serialize)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_carries_count() {
        let body = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(body, json!({"success": true, "count": 3, "data": [1, 2, 3]}));
    }

    #[test]
    fn empty_payload_is_an_empty_object() {
        let body = serde_json::to_value(ApiResponse::data(Empty::default())).unwrap();
        assert_eq!(body, json!({"success": true, "data": {}}));
    }
}
