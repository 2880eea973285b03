mod watchlist;

pub use watchlist::WatchlistEntry;
