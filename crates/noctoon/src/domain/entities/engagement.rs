/// The two kinds of user-to-series join rows. Both toggle the same way,
/// only the backing table differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engagement {
    Like,
    Favorite,
}

impl Engagement {
    pub fn table(&self) -> &'static str {
        match self {
            Engagement::Like => "series_like",
            Engagement::Favorite => "series_favorite",
        }
    }
}
