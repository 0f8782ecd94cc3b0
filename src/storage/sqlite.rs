use crate::analyzer::report::DataReport;
use crate::analyzer::selection::{ModelKind, Order, RankedModel, SeasonalOrder};
use crate::model::{StorageError, WeekdaySeries};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database and makes sure the tables exist.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS series_points (
                name TEXT NOT NULL,
                date TEXT NOT NULL,
                value REAL NOT NULL,
                PRIMARY KEY (name, date)
            );

            CREATE TABLE IF NOT EXISTS data_reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL,
                json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS model_rankings (
                series TEXT NOT NULL,
                rank INTEGER NOT NULL,
                label TEXT NOT NULL,
                kind TEXT NOT NULL,
                p INTEGER NOT NULL,
                d INTEGER NOT NULL,
                q INTEGER NOT NULL,
                sp INTEGER NOT NULL,
                sd INTEGER NOT NULL,
                sq INTEGER NOT NULL,
                period INTEGER NOT NULL,
                aic REAL NOT NULL,
                bic REAL NOT NULL,
                llf REAL NOT NULL,
                PRIMARY KEY (series, rank)
            );
            "
        )?;

        Ok(Self { conn })
    }

    /// Replaces every stored point of `series.name` with the given series.
    pub fn save_series(&mut self, series: &WeekdaySeries) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM series_points WHERE name = ?1", params![&series.name])?;
        {
            let mut stmt = tx.prepare("INSERT INTO series_points (name, date, value) VALUES (?1, ?2, ?3)")?;
            for (date, value) in series.iter() {
                stmt.execute(params![&series.name, date, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn load_series(&self, name: &str) -> Result<WeekdaySeries, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT date, value FROM series_points WHERE name = ?1 ORDER BY date ASC")?;
        let rows = stmt.query_map(params![name], |row| {
            let date: NaiveDate = row.get(0)?;
            let value: f64 = row.get(1)?;
            Ok((date, value))
        })?;

        let mut points = Vec::new();
        for row in rows {
            points.push(row?);
        }
        Ok(WeekdaySeries::from_sorted(name, points))
    }

    pub fn save_report(&self, report: &DataReport) -> Result<i64, StorageError> {
        let json = serde_json::to_string(report)?;
        self.conn.execute(
            "INSERT INTO data_reports (created_at, json) VALUES (?1, ?2)",
            params![Utc::now().to_rfc3339(), json],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn latest_report(&self) -> Result<Option<DataReport>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT json FROM data_reports ORDER BY id DESC LIMIT 1")?;
        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            let json: String = row.get(0)?;
            Ok(Some(serde_json::from_str(&json)?))
        } else {
            Ok(None)
        }
    }

    /// Replaces the ranking table stored for `series`.
    pub fn save_rankings(&mut self, series: &str, table: &[RankedModel]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM model_rankings WHERE series = ?1", params![series])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO model_rankings (
                    series, rank, label, kind, p, d, q, sp, sd, sq, period, aic, bic, llf
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )?;
            for model in table {
                stmt.execute(params![
                    series,
                    model.rank as i64,
                    model.label(),
                    model.kind.to_string(),
                    model.order.p as i64,
                    model.order.d as i64,
                    model.order.q as i64,
                    model.seasonal.p as i64,
                    model.seasonal.d as i64,
                    model.seasonal.q as i64,
                    model.period as i64,
                    model.aic,
                    model.bic,
                    model.log_likelihood,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn load_rankings(&self, series: &str) -> Result<Vec<RankedModel>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT rank, kind, p, d, q, sp, sd, sq, period, aic, bic, llf
             FROM model_rankings WHERE series = ?1 ORDER BY rank ASC",
        )?;
        let rows = stmt.query_map(params![series], Self::map_ranked)?;

        let mut table = Vec::new();
        for row in rows {
            table.push(row?);
        }
        Ok(table)
    }

    fn map_ranked(row: &Row) -> Result<RankedModel, rusqlite::Error> {
        let kind_str: String = row.get(1)?;
        let kind = match kind_str.as_str() {
            "ARMA" => ModelKind::Arma,
            "ARIMA" => ModelKind::Arima,
            "SARIMA" => ModelKind::Sarima,
            other => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    1,
                    rusqlite::types::Type::Text,
                    format!("unknown model kind '{}'", other).into(),
                ));
            }
        };
        let get_usize = |idx: usize| -> Result<usize, rusqlite::Error> { Ok(row.get::<_, i64>(idx)? as usize) };

        Ok(RankedModel {
            rank: get_usize(0)?,
            kind,
            order: Order {
                p: get_usize(2)?,
                d: get_usize(3)?,
                q: get_usize(4)?,
            },
            seasonal: SeasonalOrder {
                p: get_usize(5)?,
                d: get_usize(6)?,
                q: get_usize(7)?,
            },
            period: get_usize(8)?,
            aic: row.get(9)?,
            bic: row.get(10)?,
            log_likelihood: row.get(11)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn series_are_replaced_not_appended() {
        let mut storage = SqliteStorage::new(":memory:").unwrap();
        let first = WeekdaySeries::from_sorted("WTI", vec![(d(2024, 1, 8), 70.0), (d(2024, 1, 9), 71.0)]);
        storage.save_series(&first).unwrap();
        let second = WeekdaySeries::from_sorted("WTI", vec![(d(2024, 1, 10), 72.5)]);
        storage.save_series(&second).unwrap();

        assert_eq!(storage.load_series("WTI").unwrap(), second);
        assert!(storage.load_series("USD_INR").unwrap().is_empty());
    }

    #[test]
    fn rankings_keep_their_order() {
        let mut storage = SqliteStorage::new(":memory:").unwrap();
        let model = |rank: usize, p: usize, aic: f64| RankedModel {
            rank,
            order: Order { p, d: 1, q: 0 },
            seasonal: SeasonalOrder { p: 1, d: 0, q: 0 },
            period: 5,
            kind: ModelKind::Sarima,
            aic,
            bic: aic + 3.0,
            log_likelihood: -aic / 2.0,
        };
        let table = vec![model(1, 2, 100.0), model(2, 1, 101.5)];
        storage.save_rankings("USD_INR", &table).unwrap();

        assert_eq!(storage.load_rankings("USD_INR").unwrap(), table);
        assert!(storage.load_rankings("WTI").unwrap().is_empty());
    }
}
