diesel::table! {
    workspaces (id) {
        id -> Integer,
        name -> Text,
        imported_at -> Timestamp,
    }
}

diesel::table! {
    users (id) {
        id -> Integer,
        workspace_id -> Integer,
        slack_id -> Text,
        name -> Text,
        real_name -> Nullable<Text>,
        deleted -> Bool,
        is_bot -> Bool,
        is_admin -> Nullable<Bool>,
        is_owner -> Nullable<Bool>,
        full_object -> Text,
    }
}

diesel::table! {
    channels (id) {
        id -> Integer,
        workspace_id -> Integer,
        slack_id -> Text,
        name -> Text,
        created -> Nullable<BigInt>,
        creator -> Nullable<Text>,
        is_archived -> Bool,
        is_general -> Bool,
        full_object -> Text,
    }
}

diesel::table! {
    messages (id) {
        id -> Integer,
        workspace_id -> Integer,
        // Origin channel id (the channel's slack_id), not the local row id.
        channel_id -> Text,
        ts -> Text,
        msg_type -> Text,
        subtype -> Nullable<Text>,
        user_id -> Nullable<Text>,
        bot_id -> Nullable<Text>,
        username -> Nullable<Text>,
        text -> Nullable<Text>,
        thread_ts -> Nullable<Text>,
        full_object -> Text,
    }
}

diesel::table! {
    file_cache (id) {
        id -> Integer,
        workspace_id -> Integer,
        file_id -> Text,
        mime_type -> Text,
        content -> Binary,
    }
}

diesel::allow_tables_to_appear_in_same_query!(workspaces, users, channels, messages, file_cache,);
