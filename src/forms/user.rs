use serde::Deserialize;
use serde_valid::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(min_length = 3)]
    #[validate(max_length = 320)]
    pub email: String,
    #[validate(min_length = 1)]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[validate(min_length = 3)]
    #[validate(max_length = 320)]
    pub email: String,
    #[validate(min_length = 1)]
    pub password: String,
    #[validate(max_length = 100)]
    pub first_name: String,
    #[validate(max_length = 100)]
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_reads_camel_case_names() {
        let form: SignupForm = serde_json::from_str(
            r#"{"email": "a@b.in", "password": "secret1", "firstName": "Asha", "lastName": "Rao"}"#,
        )
        .unwrap();
        assert_eq!(form.first_name, "Asha");
        assert_eq!(form.last_name, "Rao");
        assert!(form.validate().is_ok());
    }
}
