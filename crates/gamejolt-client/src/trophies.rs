use gamejolt_core::{parse_trophies, ObjectSerializer, Result, Trophy, TrophyFilter};

use crate::client::GameClient;

impl<S: ObjectSerializer> GameClient<S> {
    pub fn all_trophies(&self) -> Result<Vec<Trophy>> {
        self.trophies(TrophyFilter::All)
    }

    pub fn achieved_trophies(&self) -> Result<Vec<Trophy>> {
        self.trophies(TrophyFilter::Achieved)
    }

    pub fn unachieved_trophies(&self) -> Result<Vec<Trophy>> {
        self.trophies(TrophyFilter::Unachieved)
    }

    pub fn trophies(&self, filter: TrophyFilter) -> Result<Vec<Trophy>> {
        let user = self.session().require()?;
        let text = self.call(&self.requests().trophies(&user, filter))?;
        parse_trophies(&text)
    }

    /// A single trophy, or `None` when the service lists nothing for `id`.
    pub fn trophy(&self, id: u64) -> Result<Option<Trophy>> {
        let user = self.session().require()?;
        let text = self.call(&self.requests().trophy(&user, id))?;
        Ok(parse_trophies(&text)?.into_iter().next())
    }

    /// Mark a trophy achieved. `false` when the service refuses, e.g. because
    /// the user already has it.
    pub fn achieve_trophy(&self, id: u64) -> Result<bool> {
        let user = self.session().require()?;
        self.call_for_success(&self.requests().achieve_trophy(&user, id))
    }
}
