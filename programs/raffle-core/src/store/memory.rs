use std::{
    collections::BTreeMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use borsh::{BorshDeserialize, BorshSerialize};
use uuid::Uuid;

use super::{RaffleStore, TicketStore};
use crate::{
    error::{RaffleError, Result},
    state::{Raffle, Ticket, RAFFLE_RECORD_SIZE, TICKET_RECORD_SIZE},
};

type TicketKey = ([u8; 16], String);

#[derive(BorshSerialize, BorshDeserialize, Default)]
struct Tables {
    raffles: BTreeMap<[u8; 16], Vec<u8>>,
    tickets: BTreeMap<TicketKey, Vec<u8>>,
}

/// In-process store keeping borsh-encoded records.
///
/// Both tables sit behind one lock, so the conditional writes (`try_close`, and
/// `upsert` checking its parent raffle) are single critical sections.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes the whole store into one blob.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(self.read()?.try_to_vec()?)
    }

    /// Rebuilds a store from a `snapshot`. Every record is decoded up front so a
    /// corrupt blob is rejected here rather than on first access.
    pub fn restore(bytes: &[u8]) -> Result<Self> {
        let tables = Tables::try_from_slice(bytes)?;
        for record in tables.raffles.values() {
            Raffle::try_from_slice(record)?;
        }
        for record in tables.tickets.values() {
            Ticket::try_from_slice(record)?;
        }
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| RaffleError::StoreUnavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| RaffleError::StoreUnavailable("lock poisoned".to_string()))
    }
}

fn encode<T: BorshSerialize>(record: &T, max: usize) -> Result<Vec<u8>> {
    let bytes = record.try_to_vec()?;
    if bytes.len() > max {
        return Err(RaffleError::RecordTooLarge { max });
    }
    Ok(bytes)
}

impl RaffleStore for MemoryStore {
    fn create(&self, raffle: &Raffle) -> Result<()> {
        let bytes = encode(raffle, RAFFLE_RECORD_SIZE)?;
        let mut tables = self.write()?;
        let key = raffle.id().into_bytes();
        if tables.raffles.contains_key(&key) {
            return Err(RaffleError::DuplicateRaffle);
        }
        tables.raffles.insert(key, bytes);
        Ok(())
    }

    fn get(&self, raffle_id: Uuid) -> Result<Option<Raffle>> {
        let tables = self.read()?;
        tables
            .raffles
            .get(raffle_id.as_bytes())
            .map(|bytes| Raffle::try_from_slice(bytes).map_err(RaffleError::from))
            .transpose()
    }

    fn try_close(&self, raffle_id: Uuid, result: &str) -> Result<bool> {
        let mut tables = self.write()?;
        let Some(record) = tables.raffles.get_mut(raffle_id.as_bytes()) else {
            return Ok(false);
        };

        let mut raffle = Raffle::try_from_slice(record)?;
        if !raffle.close_with(result.to_string()) {
            return Ok(false);
        }
        *record = encode(&raffle, RAFFLE_RECORD_SIZE)?;
        Ok(true)
    }
}

impl TicketStore for MemoryStore {
    fn upsert(&self, ticket: &Ticket) -> Result<bool> {
        let bytes = encode(ticket, TICKET_RECORD_SIZE)?;
        let mut tables = self.write()?;

        let raffle_key = ticket.raffle_id().into_bytes();
        let parent_open = match tables.raffles.get(&raffle_key) {
            Some(record) => Raffle::try_from_slice(record)?.is_open(),
            None => false,
        };
        if !parent_open {
            return Ok(false);
        }

        tables
            .tickets
            .insert((raffle_key, ticket.owner.clone()), bytes);
        Ok(true)
    }

    fn list_by_raffle(&self, raffle_id: Uuid) -> Result<Vec<Ticket>> {
        let tables = self.read()?;
        let raffle_key = raffle_id.into_bytes();
        tables
            .tickets
            .range((raffle_key, String::new())..)
            .take_while(|((key, _), _)| *key == raffle_key)
            .map(|(_, bytes)| Ticket::try_from_slice(bytes).map_err(RaffleError::from))
            .collect()
    }
}
