use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: u32,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub publish_date: String,
    #[serde(default)]
    pub read_time: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl BlogPost {
    fn matches_term(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.excerpt.to_lowercase().contains(&term)
            || self.content.to_lowercase().contains(&term)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlogQuery {
    pub term: Option<String>,
    pub category: Option<String>,
}

impl BlogQuery {
    pub fn matches(&self, post: &BlogPost) -> bool {
        self.term.as_deref().map_or(true, |t| post.matches_term(t))
            && self.category.as_deref().map_or(true, |c| post.category == c)
    }

    pub fn apply<'a>(&self, posts: &'a [BlogPost]) -> Vec<&'a BlogPost> {
        posts.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Distinct categories in first-seen order
pub fn categories(posts: &[BlogPost]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for post in posts {
        if !seen.contains(&post.category.as_str()) {
            seen.push(&post.category);
        }
    }
    seen
}
