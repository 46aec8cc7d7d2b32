use std::collections::VecDeque;

use serde::de::DeserializeOwned;

use crate::{
    error::FetchError,
    spotify::{auth::TokenSource, fetcher::Fetcher, transport::Transport},
    types::{Artist, Page, SeveralArtists},
    warning,
};

/// A response shape that splits into items and an optional next pointer.
pub trait PageShape: DeserializeOwned {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

impl<T: DeserializeOwned> PageShape for Page<T> {
    type Item = T;

    fn into_parts(self) -> (Vec<T>, Option<String>) {
        (self.items, self.next)
    }
}

impl PageShape for SeveralArtists {
    type Item = Artist;

    fn into_parts(self) -> (Vec<Artist>, Option<String>) {
        (self.artists.into_iter().flatten().collect(), None)
    }
}

/// Lazy, finite, non-restartable walk over paginated results.
///
/// Starts from a seed URL and follows each page's next pointer verbatim
/// until a page has none. After the first error the walk ends.
pub struct Paginator<'f, P: PageShape, T, S> {
    fetcher: &'f mut Fetcher<T, S>,
    next_url: Option<String>,
    buffer: VecDeque<P::Item>,
    pages: usize,
    max_pages: Option<usize>,
}

impl<'f, P, T, S> Paginator<'f, P, T, S>
where
    P: PageShape,
    T: Transport,
    S: TokenSource,
{
    pub fn new(fetcher: &'f mut Fetcher<T, S>, seed: String) -> Self {
        let max_pages = fetcher.max_pages();
        Self {
            fetcher,
            next_url: Some(seed),
            buffer: VecDeque::new(),
            pages: 0,
            max_pages,
        }
    }

    /// Number of pages requested so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Fetches the next page. `None` once the walk is exhausted.
    pub async fn next_page(&mut self) -> Option<Result<Vec<P::Item>, FetchError>> {
        let url = self.next_url.take()?;

        if let Some(cap) = self.max_pages {
            if self.pages >= cap {
                warning!("Stopped after {} pages, next page was {}", cap, url);
                return None;
            }
        }

        self.pages += 1;
        match self.fetcher.get_json::<P>(&url).await {
            Ok(page) => {
                let (items, next) = page.into_parts();
                self.next_url = next;
                Some(Ok(items))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Next item across page boundaries.
    pub async fn next(&mut self) -> Option<Result<P::Item, FetchError>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            match self.next_page().await? {
                Ok(items) => self.buffer.extend(items),
                Err(e) => return Some(Err(e)),
            }
        }
    }

    /// Drains the walk. Items read before a failure are returned with it.
    pub async fn collect_all(mut self) -> (Vec<P::Item>, Option<FetchError>) {
        let mut items = Vec::new();
        while let Some(next) = self.next().await {
            match next {
                Ok(item) => items.push(item),
                Err(e) => return (items, Some(e)),
            }
        }
        (items, None)
    }
}
