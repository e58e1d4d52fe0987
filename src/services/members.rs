//! Member management service

use crate::{
    error::AppResult,
    models::{
        loan::BookBorrow,
        member::{CreateMember, Member, UpdateMember},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List members
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<(Vec<Member>, i64)> {
        self.repository.members.list(limit, offset).await
    }

    /// Get member by id
    pub async fn get(&self, id: i32) -> AppResult<Member> {
        self.repository.members.get_by_id(id).await
    }

    /// Create a new member
    pub async fn create(&self, data: &CreateMember) -> AppResult<Member> {
        self.repository.members.create(data).await
    }

    /// Update member fields
    pub async fn update(&self, id: i32, data: &UpdateMember) -> AppResult<Member> {
        self.repository.members.update(id, data).await
    }

    /// Delete a member
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.members.delete(id).await
    }

    /// Loans for one member
    pub async fn get_loans(&self, member_id: i32) -> AppResult<Vec<BookBorrow>> {
        // Verify member exists
        self.repository.members.get_by_id(member_id).await?;
        self.repository.loans.get_member_loans(member_id).await
    }
}
