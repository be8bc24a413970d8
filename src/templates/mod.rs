use crate::models::StoredFile;
use minijinja::{Environment, context};

const INDEX_TEMPLATE: &str = "index.html";

/// Compiled-in HTML templates
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("index.html"))?;
        Ok(Self { env })
    }

    pub fn render_index(&self, files: &[StoredFile]) -> Result<String, minijinja::Error> {
        self.env
            .get_template(INDEX_TEMPLATE)?
            .render(context! { files => files })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_index_lists_files() {
        let templates = Templates::new().unwrap();
        let files = vec![StoredFile {
            name: "Song <1>.mp3".to_string(),
            size_bytes: 2048,
            size_label: "2.0 KB".to_string(),
            modified: None,
        }];

        let html = templates.render_index(&files).unwrap();
        assert!(html.contains("Song &lt;1&gt;.mp3"));
        assert!(html.contains("2.0 KB"));
        assert!(!html.contains("No files"));
    }

    #[test]
    fn test_render_index_empty() {
        let templates = Templates::new().unwrap();
        let html = templates.render_index(&[]).unwrap();
        assert!(html.contains("No files"));
        assert!(!html.contains("<table>"));
    }
}
