use crate::error::{FactorecError, Result};
use crate::models::Rating;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

const FIELDS: [&str; 4] = ["user id", "item id", "rating", "timestamp"];

/// Reads `user item rating timestamp` records from a file, in file order.
pub fn load_ratings<P: AsRef<Path>>(path: P) -> Result<Vec<Rating>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FactorecError::source_unavailable(path, e))?;

    let ratings = parse_ratings(BufReader::new(file), path)?;
    info!("Loaded {} ratings from {}", ratings.len(), path.display());
    Ok(ratings)
}

/// Parses whitespace-separated integer records. A record may span lines;
/// `origin` only labels errors.
pub fn parse_ratings<R: BufRead>(reader: R, origin: &Path) -> Result<Vec<Rating>> {
    let mut ratings = Vec::new();
    let mut pending: Vec<(usize, String)> = Vec::with_capacity(FIELDS.len());

    for (index, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes.map_err(|e| FactorecError::source_unavailable(origin, e))?;
        let line_number = index + 1;
        let line = String::from_utf8(bytes).map_err(|_| FactorecError::Parse {
            path: origin.to_path_buf(),
            line: line_number,
            reason: "invalid UTF-8".to_string(),
        })?;

        for token in line.split_whitespace() {
            pending.push((line_number, token.to_string()));
            if pending.len() == FIELDS.len() {
                ratings.push(parse_record(&pending, origin)?);
                pending.clear();
            }
        }
    }

    if let Some((line, _)) = pending.first() {
        return Err(FactorecError::Parse {
            path: origin.to_path_buf(),
            line: *line,
            reason: format!(
                "incomplete record: expected {} fields, found {}",
                FIELDS.len(),
                pending.len()
            ),
        });
    }

    Ok(ratings)
}

fn parse_record(tokens: &[(usize, String)], origin: &Path) -> Result<Rating> {
    Ok(Rating {
        user_id: parse_field(&tokens[0], FIELDS[0], origin)?,
        item_id: parse_field(&tokens[1], FIELDS[1], origin)?,
        rating: parse_field(&tokens[2], FIELDS[2], origin)?,
        timestamp: parse_field(&tokens[3], FIELDS[3], origin)?,
    })
}

fn parse_field<T: FromStr>(token: &(usize, String), field: &str, origin: &Path) -> Result<T> {
    let (line, text) = token;
    text.parse().map_err(|_| FactorecError::Parse {
        path: origin.to_path_buf(),
        line: *line,
        reason: format!("invalid {} `{}`", field, text),
    })
}
