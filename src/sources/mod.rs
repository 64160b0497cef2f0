// Data acquisition — chat exports, stargazers, and the GitHub API client.

pub mod github;
pub mod messages;
pub mod stargazers;
