use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Article;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleStats {
    pub total: usize,
    pub by_category: Vec<Tally>,
    pub by_author: Vec<Tally>,
}

impl ArticleStats {
    pub fn from_articles<'a, I>(articles: I) -> Self
    where
        I: IntoIterator<Item = &'a Article> + Clone,
    {
        let by_category = tally(articles.clone(), |a| a.category.as_str());
        let by_author = tally(articles, |a| a.author.as_str());
        Self {
            total: by_category.iter().map(|t| t.count).sum(),
            by_category,
            by_author,
        }
    }
}

pub fn counts_by_category<'a>(articles: impl IntoIterator<Item = &'a Article>) -> Vec<Tally> {
    tally(articles, |a| a.category.as_str())
}

pub fn counts_by_author<'a>(articles: impl IntoIterator<Item = &'a Article>) -> Vec<Tally> {
    tally(articles, |a| a.author.as_str())
}

/// Authors in order of first appearance, without duplicates.
pub fn distinct_authors<'a>(articles: impl IntoIterator<Item = &'a Article>) -> Vec<String> {
    counts_by_author(articles).into_iter().map(|t| t.name).collect()
}

fn tally<'a, I, F>(articles: I, key: F) -> Vec<Tally>
where
    I: IntoIterator<Item = &'a Article>,
    F: Fn(&'a Article) -> &'a str,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<Tally> = Vec::new();

    for article in articles {
        let name = key(article);
        match index.get(name) {
            Some(&i) => tallies[i].count += 1,
            None => {
                index.insert(name, tallies.len());
                tallies.push(Tally {
                    name: name.to_string(),
                    count: 1,
                });
            }
        }
    }

    tallies
}
