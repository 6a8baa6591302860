//! Rule-based cleaning of free-text historical dates ("late 16th century",
//! "300 BC - 100 AD", "Ming dynasty (1368–1644), c. 1590s") into a year
//! interval, a canonical English rendering and a quality flag.

pub mod additional;
pub mod correction;
pub mod error;
pub mod formatted;
pub mod lexicon;
pub mod lookup;
pub mod normalize;
pub mod numbers;
pub mod parser;
pub mod period;
pub mod qualifier;
pub mod scanner;
pub mod splitter;
pub mod types;
pub mod year;

pub use date_types::{CleanedDate, DateFlag};
pub use error::CleanError;
pub use lookup::{DateLookup, KeywordSpeller, LookupEntry, LookupTables, SpellCorrector};
pub use parser::{clean_date, parse_date, ParseOptions};
