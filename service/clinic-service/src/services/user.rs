use clinic_model::{Credential, Privilege, Role, User};

use crate::dao::{single, CredentialDao, PrivilegeDao, RoleDao, UserDao};
use crate::error::Result;
use crate::resource::{
    LOCAL_CREDENTIAL, SEARCH_PRIVILEGE, SEARCH_ROLE, SEARCH_USER, UUID_PRIVILEGE, UUID_ROLE, UUID_USER,
};

/// Users together with the credentials, privileges and roles that belong to them.
pub struct UserService {
    users: UserDao,
    credentials: CredentialDao,
    privileges: PrivilegeDao,
    roles: RoleDao,
}

impl UserService {
    pub fn new(users: UserDao, credentials: CredentialDao, privileges: PrivilegeDao, roles: RoleDao) -> Self {
        Self { users, credentials, privileges, roles }
    }

    pub fn download_user_by_uuid(&self, uuid: &str) -> Result<Option<User>> {
        self.users.download_one(&[("uuid", uuid)], UUID_USER)
    }

    /// The server search is fuzzy; keep exact username matches only.
    pub fn download_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let matches: Vec<User> = self
            .users
            .fetch(&[("q", username)], SEARCH_USER)?
            .into_iter()
            .filter(|u| u.username == username)
            .collect();
        let user = single(matches, SEARCH_USER)?;
        if let Some(u) = &user {
            self.users.local().save(u, SEARCH_USER)?;
        }
        Ok(user)
    }

    pub fn download_users_by_name(&self, name: &str) -> Result<Vec<User>> {
        self.users.download(&[("q", name)], SEARCH_USER)
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        self.users.local().save(user, UUID_USER)
    }

    pub fn update_user(&self, user: &User) -> Result<()> {
        self.users.local().update(user, UUID_USER)
    }

    pub fn get_user_by_uuid(&self, uuid: &str) -> Result<Option<User>> {
        self.users.local().get_by_uuid(uuid)
    }

    pub fn get_users_by_name(&self, name: &str) -> Result<Vec<User>> {
        self.users.local().get_by_name(name)
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.users.get_by_username(username)
    }

    pub fn get_all_users(&self) -> Result<Vec<User>> {
        self.users.local().get_all()
    }

    pub fn delete_user(&self, user: &User) -> Result<()> {
        self.users.local().delete(user, UUID_USER)
    }

    pub fn save_credential(&self, credential: &Credential) -> Result<()> {
        self.credentials.save(credential, LOCAL_CREDENTIAL)
    }

    pub fn update_credential(&self, credential: &Credential) -> Result<()> {
        self.credentials.update(credential, LOCAL_CREDENTIAL)
    }

    pub fn get_credential_by_uuid(&self, uuid: &str) -> Result<Option<Credential>> {
        self.credentials.get_by_uuid(uuid)
    }

    pub fn get_credential_by_username(&self, username: &str) -> Result<Option<Credential>> {
        self.credentials.get_by_username(username)
    }

    pub fn get_credential_by_user_uuid(&self, user_uuid: &str) -> Result<Option<Credential>> {
        self.credentials.get_by_user_uuid(user_uuid)
    }

    pub fn get_all_credentials(&self) -> Result<Vec<Credential>> {
        self.credentials.get_all()
    }

    pub fn delete_credential(&self, credential: &Credential) -> Result<()> {
        self.credentials.delete(credential, LOCAL_CREDENTIAL)
    }

    pub fn delete_all_credentials(&self) -> Result<usize> {
        self.credentials.delete_all(LOCAL_CREDENTIAL)
    }

    /// Offline login check against the stored credential.
    pub fn verify_credential(&self, username: &str, password: &str) -> Result<bool> {
        Ok(self
            .credentials
            .get_by_username(username)?
            .map(|c| c.matches(password))
            .unwrap_or(false))
    }

    pub fn download_privilege(&self, uuid: &str) -> Result<Option<Privilege>> {
        self.privileges.download_one(&[("uuid", uuid)], UUID_PRIVILEGE)
    }

    pub fn download_privileges(&self, name: &str) -> Result<Vec<Privilege>> {
        self.privileges.download(&[("q", name)], SEARCH_PRIVILEGE)
    }

    pub fn save_privilege(&self, privilege: &Privilege) -> Result<()> {
        self.privileges.local().save(privilege, UUID_PRIVILEGE)
    }

    pub fn update_privilege(&self, privilege: &Privilege) -> Result<()> {
        self.privileges.local().update(privilege, UUID_PRIVILEGE)
    }

    pub fn get_privilege_by_uuid(&self, uuid: &str) -> Result<Option<Privilege>> {
        self.privileges.local().get_by_uuid(uuid)
    }

    pub fn get_privileges_by_name(&self, name: &str) -> Result<Vec<Privilege>> {
        self.privileges.local().get_by_name(name)
    }

    pub fn delete_privilege(&self, privilege: &Privilege) -> Result<()> {
        self.privileges.local().delete(privilege, UUID_PRIVILEGE)
    }

    pub fn download_role(&self, uuid: &str) -> Result<Option<Role>> {
        self.roles.download_one(&[("uuid", uuid)], UUID_ROLE)
    }

    pub fn download_roles(&self, name: &str) -> Result<Vec<Role>> {
        self.roles.download(&[("q", name)], SEARCH_ROLE)
    }

    pub fn save_role(&self, role: &Role) -> Result<()> {
        self.roles.local().save(role, UUID_ROLE)
    }

    pub fn update_role(&self, role: &Role) -> Result<()> {
        self.roles.local().update(role, UUID_ROLE)
    }

    pub fn get_role_by_uuid(&self, uuid: &str) -> Result<Option<Role>> {
        self.roles.local().get_by_uuid(uuid)
    }

    pub fn get_roles_by_name(&self, name: &str) -> Result<Vec<Role>> {
        self.roles.local().get_by_name(name)
    }

    pub fn delete_role(&self, role: &Role) -> Result<()> {
        self.roles.local().delete(role, UUID_ROLE)
    }
}
