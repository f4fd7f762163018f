pub mod branch_name;

/// Ref-name rules: no leading dot, no `/.`, no `..`, no leading or trailing
/// slash, no `.lock` suffix, no `@{`, no control characters, spaces or
/// any of `*:?[\~^`
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
