use crate::config::Config;

/// Prints the resolved configuration, with the token masked.
pub fn env(config: &Config) {
    println!("API server base URL: {}", config.server.base_url());
    match &config.security {
        Some(security) => println!(
            "Security context: {} {}",
            security.auth_token_type,
            mask_token(&security.auth_token)
        ),
        None => println!("Security context: (not set)"),
    }
    if let Some(job_id) = &config.job_id {
        println!("Job ID: {}", job_id);
    }
    if let Some(workspace_id) = &config.workspace_id {
        println!("Workspace ID: {}", workspace_id);
    }
    if let Some(project_id) = &config.project_context_id {
        println!("Project context ID: {}", project_id);
    }
}

/// Keeps enough of the token to recognize it, nothing more.
fn mask_token(token: &str) -> String {
    if token.len() <= 8 {
        return "********".to_string();
    }
    format!("{}*********{}", &token[..4], &token[token.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token_keeps_edges() {
        assert_eq!(mask_token("outside-1234-secret"), "outs*********cret");
    }

    #[test]
    fn test_mask_token_hides_short_tokens_entirely() {
        assert_eq!(mask_token("tiny"), "********");
        assert_eq!(mask_token("12345678"), "********");
    }
}
