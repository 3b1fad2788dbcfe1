use reqwest::Method;

/// A single call routed through [`Client::dispatch`](super::Client::dispatch).
///
/// Requests without form values are sent as GET. Requests carrying form
/// values, even an empty set, are sent as a form-encoded POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    path: String,
    form: Option<Vec<(String, String)>>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            form: None,
        }
    }

    pub fn post<I, K, V>(path: impl Into<String>, form: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            path: path.into(),
            form: Some(
                form.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn form(&self) -> Option<&[(String, String)]> {
        self.form.as_deref()
    }

    pub fn method(&self) -> Method {
        if self.form.is_some() {
            Method::POST
        } else {
            Method::GET
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_has_no_form() {
        let req = ApiRequest::get("/membersite/member/GetMember");
        assert_eq!(req.method(), Method::GET);
        assert!(req.form().is_none());
        assert_eq!(req.path(), "/membersite/member/GetMember");
    }

    #[test]
    fn test_empty_form_is_still_post() {
        let req = ApiRequest::post("/stats", Vec::<(String, String)>::new());
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.form(), Some(&[][..]));
    }

    #[test]
    fn test_post_keeps_repeated_keys_in_order() {
        let req = ApiRequest::post("/stats", [("car", "1"), ("car", "2"), ("season", "3")]);
        let form = req.form().expect("form should be present");
        let keys: Vec<&str> = form.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["car", "car", "season"]);
        assert_eq!(form[1].1, "2");
    }
}
