use std::env;

use crate::{
    error::{Error, Result},
    id::OneId,
};

/// Environment variable holding the server id.
pub const SERVER_ID_KEY: &str = "SERVER_ID";

/// Environment variable holding the process id. `0` selects the OS pid.
pub const PROCESS_ID_KEY: &str = "PROCESS_ID";

/// A server id and process id read from external configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvIds<ID: OneId> {
    pub server_id: ID,
    pub process_id: ID,
}

impl<ID: OneId> EnvIds<ID> {
    /// Reads [`SERVER_ID_KEY`] and [`PROCESS_ID_KEY`] from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingEnv`] if a variable is unset or not unicode
    /// - [`Error::ParseId`] if a value is not a base-10 integer of width `ID`
    /// - [`Error::InvalidServerId`] if the server id is below one
    /// - [`Error::InvalidProcessId`] if the process id is negative
    pub fn from_env() -> Result<Self> {
        let server_id = read_var(SERVER_ID_KEY)?;
        let server_id = parse_server_id::<ID>(&server_id)?;
        let process_id = read_var(PROCESS_ID_KEY)?;
        let process_id = parse_process_id::<ID>(&process_id)?;
        Ok(Self {
            server_id,
            process_id,
        })
    }

    /// Parses raw values with the same rules as [`EnvIds::from_env`].
    ///
    /// # Example
    /// ```
    /// use oneid::{EnvIds, Error};
    ///
    /// let ids = EnvIds::<i64>::parse("100", "0").unwrap();
    /// assert_eq!((ids.server_id, ids.process_id), (100, 0));
    ///
    /// assert!(matches!(EnvIds::<i64>::parse("0", "1"), Err(Error::InvalidServerId { value: 0 })));
    /// assert!(matches!(EnvIds::<u32>::parse("100_000", "1"), Err(Error::ParseId { .. })));
    /// ```
    ///
    /// # Errors
    ///
    /// Same as [`EnvIds::from_env`], minus [`Error::MissingEnv`].
    pub fn parse(server_id: &str, process_id: &str) -> Result<Self> {
        Ok(Self {
            server_id: parse_server_id::<ID>(server_id)?,
            process_id: parse_process_id::<ID>(process_id)?,
        })
    }
}

fn read_var(key: &'static str) -> Result<String> {
    env::var(key).map_err(|_| Error::MissingEnv { key })
}

fn parse_id<ID: OneId>(key: &'static str, value: &str) -> Result<ID> {
    value.parse::<ID>().map_err(|source| Error::ParseId {
        key,
        value: value.to_owned(),
        width: ID::NAME,
        source,
    })
}

fn parse_server_id<ID: OneId>(value: &str) -> Result<ID> {
    let server_id = parse_id::<ID>(SERVER_ID_KEY, value)?;
    if server_id <= ID::ZERO {
        return Err(Error::InvalidServerId {
            value: server_id.to_i128(),
        });
    }
    Ok(server_id)
}

fn parse_process_id<ID: OneId>(value: &str) -> Result<ID> {
    let process_id = parse_id::<ID>(PROCESS_ID_KEY, value)?;
    if process_id < ID::ZERO {
        return Err(Error::InvalidProcessId {
            value: process_id.to_i128(),
        });
    }
    Ok(process_id)
}
