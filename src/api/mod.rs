//! Per-method sugar over [`Bot::call`].
//!
//! Each wrapper declares which of its parameters may carry files and, for
//! media methods, which sub-fields of each media item may too; nothing else.
//! The generic [`Bot::call`] stays the canonical entry point for methods
//! without a wrapper here.

use serde_json::Value;

use crate::client::{Bot, MethodCall};

const MEDIA_FIELDS: [&str; 3] = ["media", "thumbnail", "cover"];

impl Bot {
    /// [getMe](https://core.telegram.org/bots/api#getme) - basic
    /// information about the bot.
    pub fn get_me(&self) -> MethodCall {
        self.call("getMe", Value::Null)
    }

    /// [logOut](https://core.telegram.org/bots/api#logout) - log out from
    /// the cloud Bot API server before running the bot locally. Always
    /// dispatched to the cloud endpoint.
    pub fn log_out(&self) -> MethodCall {
        self.call("logOut", Value::Null)
    }

    /// [close](https://core.telegram.org/bots/api#close) - close the bot
    /// instance before moving it to another local server.
    pub fn close(&self) -> MethodCall {
        self.call("close", Value::Null)
    }

    /// [getUpdates](https://core.telegram.org/bots/api#getupdates) - the
    /// long-poll fetch. `start_polling` drives this for you.
    pub fn get_updates(&self, params: Value) -> MethodCall {
        self.call("getUpdates", params)
    }

    /// [sendMessage](https://core.telegram.org/bots/api#sendmessage)
    pub fn send_message(&self, params: Value) -> MethodCall {
        self.call("sendMessage", params)
    }

    /// [forwardMessage](https://core.telegram.org/bots/api#forwardmessage)
    pub fn forward_message(&self, params: Value) -> MethodCall {
        self.call("forwardMessage", params)
    }

    /// [copyMessage](https://core.telegram.org/bots/api#copymessage)
    pub fn copy_message(&self, params: Value) -> MethodCall {
        self.call("copyMessage", params)
    }

    /// [sendPhoto](https://core.telegram.org/bots/api#sendphoto)
    pub fn send_photo(&self, params: Value) -> MethodCall {
        self.call("sendPhoto", params).file_params(["photo"])
    }

    /// [sendAudio](https://core.telegram.org/bots/api#sendaudio)
    pub fn send_audio(&self, params: Value) -> MethodCall {
        self.call("sendAudio", params)
            .file_params(["audio", "thumbnail"])
    }

    /// [sendDocument](https://core.telegram.org/bots/api#senddocument)
    pub fn send_document(&self, params: Value) -> MethodCall {
        self.call("sendDocument", params)
            .file_params(["document", "thumbnail"])
    }

    /// [sendVideo](https://core.telegram.org/bots/api#sendvideo)
    pub fn send_video(&self, params: Value) -> MethodCall {
        self.call("sendVideo", params)
            .file_params(["video", "thumbnail", "cover"])
    }

    /// [sendAnimation](https://core.telegram.org/bots/api#sendanimation)
    pub fn send_animation(&self, params: Value) -> MethodCall {
        self.call("sendAnimation", params)
            .file_params(["animation", "thumbnail"])
    }

    /// [sendVoice](https://core.telegram.org/bots/api#sendvoice)
    pub fn send_voice(&self, params: Value) -> MethodCall {
        self.call("sendVoice", params).file_params(["voice"])
    }

    /// [sendVideoNote](https://core.telegram.org/bots/api#sendvideonote)
    pub fn send_video_note(&self, params: Value) -> MethodCall {
        self.call("sendVideoNote", params)
            .file_params(["video_note", "thumbnail"])
    }

    /// [sendMediaGroup](https://core.telegram.org/bots/api#sendmediagroup) -
    /// album of 2-10 items; local files inside the media list are uploaded
    /// as `attach://` parts.
    pub fn send_media_group(&self, params: Value) -> MethodCall {
        self.call("sendMediaGroup", params)
            .media_params("media", MEDIA_FIELDS)
    }

    /// [sendLocation](https://core.telegram.org/bots/api#sendlocation)
    pub fn send_location(&self, params: Value) -> MethodCall {
        self.call("sendLocation", params)
    }

    /// [sendVenue](https://core.telegram.org/bots/api#sendvenue)
    pub fn send_venue(&self, params: Value) -> MethodCall {
        self.call("sendVenue", params)
    }

    /// [sendContact](https://core.telegram.org/bots/api#sendcontact)
    pub fn send_contact(&self, params: Value) -> MethodCall {
        self.call("sendContact", params)
    }

    /// [sendPoll](https://core.telegram.org/bots/api#sendpoll)
    pub fn send_poll(&self, params: Value) -> MethodCall {
        self.call("sendPoll", params)
    }

    /// [sendDice](https://core.telegram.org/bots/api#senddice)
    pub fn send_dice(&self, params: Value) -> MethodCall {
        self.call("sendDice", params)
    }

    /// [sendChatAction](https://core.telegram.org/bots/api#sendchataction)
    pub fn send_chat_action(&self, params: Value) -> MethodCall {
        self.call("sendChatAction", params)
    }

    /// [setMessageReaction](https://core.telegram.org/bots/api#setmessagereaction)
    pub fn set_message_reaction(&self, params: Value) -> MethodCall {
        self.call("setMessageReaction", params)
    }

    /// [getUserProfilePhotos](https://core.telegram.org/bots/api#getuserprofilephotos)
    pub fn get_user_profile_photos(&self, params: Value) -> MethodCall {
        self.call("getUserProfilePhotos", params)
    }

    /// [getFile](https://core.telegram.org/bots/api#getfile) - fetch the
    /// `file_path` needed by [`Bot::download`].
    pub fn get_file(&self, params: Value) -> MethodCall {
        self.call("getFile", params)
    }

    /// [banChatMember](https://core.telegram.org/bots/api#banchatmember)
    pub fn ban_chat_member(&self, params: Value) -> MethodCall {
        self.call("banChatMember", params)
    }

    /// [unbanChatMember](https://core.telegram.org/bots/api#unbanchatmember)
    pub fn unban_chat_member(&self, params: Value) -> MethodCall {
        self.call("unbanChatMember", params)
    }

    /// [restrictChatMember](https://core.telegram.org/bots/api#restrictchatmember)
    pub fn restrict_chat_member(&self, params: Value) -> MethodCall {
        self.call("restrictChatMember", params)
    }

    /// [promoteChatMember](https://core.telegram.org/bots/api#promotechatmember)
    pub fn promote_chat_member(&self, params: Value) -> MethodCall {
        self.call("promoteChatMember", params)
    }

    /// [setChatPhoto](https://core.telegram.org/bots/api#setchatphoto)
    pub fn set_chat_photo(&self, params: Value) -> MethodCall {
        self.call("setChatPhoto", params).file_params(["photo"])
    }

    /// [deleteChatPhoto](https://core.telegram.org/bots/api#deletechatphoto)
    pub fn delete_chat_photo(&self, params: Value) -> MethodCall {
        self.call("deleteChatPhoto", params)
    }

    /// [setChatTitle](https://core.telegram.org/bots/api#setchattitle)
    pub fn set_chat_title(&self, params: Value) -> MethodCall {
        self.call("setChatTitle", params)
    }

    /// [setChatDescription](https://core.telegram.org/bots/api#setchatdescription)
    pub fn set_chat_description(&self, params: Value) -> MethodCall {
        self.call("setChatDescription", params)
    }

    /// [pinChatMessage](https://core.telegram.org/bots/api#pinchatmessage)
    pub fn pin_chat_message(&self, params: Value) -> MethodCall {
        self.call("pinChatMessage", params)
    }

    /// [unpinChatMessage](https://core.telegram.org/bots/api#unpinchatmessage)
    pub fn unpin_chat_message(&self, params: Value) -> MethodCall {
        self.call("unpinChatMessage", params)
    }

    /// [leaveChat](https://core.telegram.org/bots/api#leavechat)
    pub fn leave_chat(&self, params: Value) -> MethodCall {
        self.call("leaveChat", params)
    }

    /// [getChat](https://core.telegram.org/bots/api#getchat)
    pub fn get_chat(&self, params: Value) -> MethodCall {
        self.call("getChat", params)
    }

    /// [getChatAdministrators](https://core.telegram.org/bots/api#getchatadministrators)
    pub fn get_chat_administrators(&self, params: Value) -> MethodCall {
        self.call("getChatAdministrators", params)
    }

    /// [getChatMemberCount](https://core.telegram.org/bots/api#getchatmembercount)
    pub fn get_chat_member_count(&self, params: Value) -> MethodCall {
        self.call("getChatMemberCount", params)
    }

    /// [getChatMember](https://core.telegram.org/bots/api#getchatmember)
    pub fn get_chat_member(&self, params: Value) -> MethodCall {
        self.call("getChatMember", params)
    }

    /// [answerCallbackQuery](https://core.telegram.org/bots/api#answercallbackquery)
    pub fn answer_callback_query(&self, params: Value) -> MethodCall {
        self.call("answerCallbackQuery", params)
    }

    /// [answerInlineQuery](https://core.telegram.org/bots/api#answerinlinequery)
    pub fn answer_inline_query(&self, params: Value) -> MethodCall {
        self.call("answerInlineQuery", params)
    }

    /// [setMyCommands](https://core.telegram.org/bots/api#setmycommands)
    pub fn set_my_commands(&self, params: Value) -> MethodCall {
        self.call("setMyCommands", params)
    }

    /// [deleteMyCommands](https://core.telegram.org/bots/api#deletemycommands)
    pub fn delete_my_commands(&self, params: Value) -> MethodCall {
        self.call("deleteMyCommands", params)
    }

    /// [getMyCommands](https://core.telegram.org/bots/api#getmycommands)
    pub fn get_my_commands(&self, params: Value) -> MethodCall {
        self.call("getMyCommands", params)
    }

    /// [editMessageText](https://core.telegram.org/bots/api#editmessagetext)
    pub fn edit_message_text(&self, params: Value) -> MethodCall {
        self.call("editMessageText", params)
    }

    /// [editMessageCaption](https://core.telegram.org/bots/api#editmessagecaption)
    pub fn edit_message_caption(&self, params: Value) -> MethodCall {
        self.call("editMessageCaption", params)
    }

    /// [editMessageMedia](https://core.telegram.org/bots/api#editmessagemedia)
    pub fn edit_message_media(&self, params: Value) -> MethodCall {
        self.call("editMessageMedia", params)
            .media_params("media", MEDIA_FIELDS)
    }

    /// [editMessageReplyMarkup](https://core.telegram.org/bots/api#editmessagereplymarkup)
    pub fn edit_message_reply_markup(&self, params: Value) -> MethodCall {
        self.call("editMessageReplyMarkup", params)
    }

    /// [deleteMessage](https://core.telegram.org/bots/api#deletemessage)
    pub fn delete_message(&self, params: Value) -> MethodCall {
        self.call("deleteMessage", params)
    }

    /// [deleteMessages](https://core.telegram.org/bots/api#deletemessages)
    pub fn delete_messages(&self, params: Value) -> MethodCall {
        self.call("deleteMessages", params)
    }

    /// [sendSticker](https://core.telegram.org/bots/api#sendsticker)
    pub fn send_sticker(&self, params: Value) -> MethodCall {
        self.call("sendSticker", params).file_params(["sticker"])
    }

    /// [setWebhook](https://core.telegram.org/bots/api#setwebhook) - the
    /// library does not host a webhook server; feed incoming updates to
    /// `Bot::process_update` yourself.
    pub fn set_webhook(&self, params: Value) -> MethodCall {
        self.call("setWebhook", params).file_params(["certificate"])
    }

    /// [deleteWebhook](https://core.telegram.org/bots/api#deletewebhook)
    pub fn delete_webhook(&self, params: Value) -> MethodCall {
        self.call("deleteWebhook", params)
    }

    /// [getWebhookInfo](https://core.telegram.org/bots/api#getwebhookinfo)
    pub fn get_webhook_info(&self) -> MethodCall {
        self.call("getWebhookInfo", Value::Null)
    }

    /// [sendPaidMedia](https://core.telegram.org/bots/api#sendpaidmedia)
    pub fn send_paid_media(&self, params: Value) -> MethodCall {
        self.call("sendPaidMedia", params)
            .media_params("media", MEDIA_FIELDS)
    }

    /// [editMessageLiveLocation](https://core.telegram.org/bots/api#editmessagelivelocation)
    pub fn edit_message_live_location(&self, params: Value) -> MethodCall {
        self.call("editMessageLiveLocation", params)
    }

    /// [stopMessageLiveLocation](https://core.telegram.org/bots/api#stopmessagelivelocation)
    pub fn stop_message_live_location(&self, params: Value) -> MethodCall {
        self.call("stopMessageLiveLocation", params)
    }

    /// [stopPoll](https://core.telegram.org/bots/api#stoppoll)
    pub fn stop_poll(&self, params: Value) -> MethodCall {
        self.call("stopPoll", params)
    }

    /// [forwardMessages](https://core.telegram.org/bots/api#forwardmessages)
    pub fn forward_messages(&self, params: Value) -> MethodCall {
        self.call("forwardMessages", params)
    }

    /// [copyMessages](https://core.telegram.org/bots/api#copymessages)
    pub fn copy_messages(&self, params: Value) -> MethodCall {
        self.call("copyMessages", params)
    }

    /// [createChatInviteLink](https://core.telegram.org/bots/api#createchatinvitelink)
    pub fn create_chat_invite_link(&self, params: Value) -> MethodCall {
        self.call("createChatInviteLink", params)
    }

    /// [editChatInviteLink](https://core.telegram.org/bots/api#editchatinvitelink)
    pub fn edit_chat_invite_link(&self, params: Value) -> MethodCall {
        self.call("editChatInviteLink", params)
    }

    /// [revokeChatInviteLink](https://core.telegram.org/bots/api#revokechatinvitelink)
    pub fn revoke_chat_invite_link(&self, params: Value) -> MethodCall {
        self.call("revokeChatInviteLink", params)
    }

    /// [exportChatInviteLink](https://core.telegram.org/bots/api#exportchatinvitelink)
    pub fn export_chat_invite_link(&self, params: Value) -> MethodCall {
        self.call("exportChatInviteLink", params)
    }

    /// [approveChatJoinRequest](https://core.telegram.org/bots/api#approvechatjoinrequest)
    pub fn approve_chat_join_request(&self, params: Value) -> MethodCall {
        self.call("approveChatJoinRequest", params)
    }

    /// [declineChatJoinRequest](https://core.telegram.org/bots/api#declinechatjoinrequest)
    pub fn decline_chat_join_request(&self, params: Value) -> MethodCall {
        self.call("declineChatJoinRequest", params)
    }

    /// [setChatPermissions](https://core.telegram.org/bots/api#setchatpermissions)
    pub fn set_chat_permissions(&self, params: Value) -> MethodCall {
        self.call("setChatPermissions", params)
    }

    /// [banChatSenderChat](https://core.telegram.org/bots/api#banchatsenderchat)
    pub fn ban_chat_sender_chat(&self, params: Value) -> MethodCall {
        self.call("banChatSenderChat", params)
    }

    /// [unbanChatSenderChat](https://core.telegram.org/bots/api#unbanchatsenderchat)
    pub fn unban_chat_sender_chat(&self, params: Value) -> MethodCall {
        self.call("unbanChatSenderChat", params)
    }

    /// [setChatAdministratorCustomTitle](https://core.telegram.org/bots/api#setchatadministratorcustomtitle)
    pub fn set_chat_administrator_custom_title(&self, params: Value) -> MethodCall {
        self.call("setChatAdministratorCustomTitle", params)
    }

    /// [unpinAllChatMessages](https://core.telegram.org/bots/api#unpinallchatmessages)
    pub fn unpin_all_chat_messages(&self, params: Value) -> MethodCall {
        self.call("unpinAllChatMessages", params)
    }

    /// [setChatStickerSet](https://core.telegram.org/bots/api#setchatstickerset)
    pub fn set_chat_sticker_set(&self, params: Value) -> MethodCall {
        self.call("setChatStickerSet", params)
    }

    /// [deleteChatStickerSet](https://core.telegram.org/bots/api#deletechatstickerset)
    pub fn delete_chat_sticker_set(&self, params: Value) -> MethodCall {
        self.call("deleteChatStickerSet", params)
    }

    /// [getForumTopicIconStickers](https://core.telegram.org/bots/api#getforumtopiciconstickers)
    pub fn get_forum_topic_icon_stickers(&self) -> MethodCall {
        self.call("getForumTopicIconStickers", Value::Null)
    }

    /// [createForumTopic](https://core.telegram.org/bots/api#createforumtopic)
    pub fn create_forum_topic(&self, params: Value) -> MethodCall {
        self.call("createForumTopic", params)
    }

    /// [editForumTopic](https://core.telegram.org/bots/api#editforumtopic)
    pub fn edit_forum_topic(&self, params: Value) -> MethodCall {
        self.call("editForumTopic", params)
    }

    /// [closeForumTopic](https://core.telegram.org/bots/api#closeforumtopic)
    pub fn close_forum_topic(&self, params: Value) -> MethodCall {
        self.call("closeForumTopic", params)
    }

    /// [reopenForumTopic](https://core.telegram.org/bots/api#reopenforumtopic)
    pub fn reopen_forum_topic(&self, params: Value) -> MethodCall {
        self.call("reopenForumTopic", params)
    }

    /// [deleteForumTopic](https://core.telegram.org/bots/api#deleteforumtopic)
    pub fn delete_forum_topic(&self, params: Value) -> MethodCall {
        self.call("deleteForumTopic", params)
    }

    /// [unpinAllForumTopicMessages](https://core.telegram.org/bots/api#unpinallforumtopicmessages)
    pub fn unpin_all_forum_topic_messages(&self, params: Value) -> MethodCall {
        self.call("unpinAllForumTopicMessages", params)
    }

    /// [setMyName](https://core.telegram.org/bots/api#setmyname)
    pub fn set_my_name(&self, params: Value) -> MethodCall {
        self.call("setMyName", params)
    }

    /// [getMyName](https://core.telegram.org/bots/api#getmyname)
    pub fn get_my_name(&self, params: Value) -> MethodCall {
        self.call("getMyName", params)
    }

    /// [setMyDescription](https://core.telegram.org/bots/api#setmydescription)
    pub fn set_my_description(&self, params: Value) -> MethodCall {
        self.call("setMyDescription", params)
    }

    /// [getMyDescription](https://core.telegram.org/bots/api#getmydescription)
    pub fn get_my_description(&self, params: Value) -> MethodCall {
        self.call("getMyDescription", params)
    }

    /// [setMyShortDescription](https://core.telegram.org/bots/api#setmyshortdescription)
    pub fn set_my_short_description(&self, params: Value) -> MethodCall {
        self.call("setMyShortDescription", params)
    }

    /// [getMyShortDescription](https://core.telegram.org/bots/api#getmyshortdescription)
    pub fn get_my_short_description(&self, params: Value) -> MethodCall {
        self.call("getMyShortDescription", params)
    }

    /// [setChatMenuButton](https://core.telegram.org/bots/api#setchatmenubutton)
    pub fn set_chat_menu_button(&self, params: Value) -> MethodCall {
        self.call("setChatMenuButton", params)
    }

    /// [getChatMenuButton](https://core.telegram.org/bots/api#getchatmenubutton)
    pub fn get_chat_menu_button(&self, params: Value) -> MethodCall {
        self.call("getChatMenuButton", params)
    }

    /// [setMyDefaultAdministratorRights](https://core.telegram.org/bots/api#setmydefaultadministratorrights)
    pub fn set_my_default_administrator_rights(&self, params: Value) -> MethodCall {
        self.call("setMyDefaultAdministratorRights", params)
    }

    /// [getMyDefaultAdministratorRights](https://core.telegram.org/bots/api#getmydefaultadministratorrights)
    pub fn get_my_default_administrator_rights(&self, params: Value) -> MethodCall {
        self.call("getMyDefaultAdministratorRights", params)
    }

    /// [getStickerSet](https://core.telegram.org/bots/api#getstickerset)
    pub fn get_sticker_set(&self, params: Value) -> MethodCall {
        self.call("getStickerSet", params)
    }

    /// [getCustomEmojiStickers](https://core.telegram.org/bots/api#getcustomemojistickers)
    pub fn get_custom_emoji_stickers(&self, params: Value) -> MethodCall {
        self.call("getCustomEmojiStickers", params)
    }

    /// [uploadStickerFile](https://core.telegram.org/bots/api#uploadstickerfile)
    pub fn upload_sticker_file(&self, params: Value) -> MethodCall {
        self.call("uploadStickerFile", params).file_params(["sticker"])
    }

    /// [createNewStickerSet](https://core.telegram.org/bots/api#createnewstickerset)
    pub fn create_new_sticker_set(&self, params: Value) -> MethodCall {
        self.call("createNewStickerSet", params)
            .media_params("stickers", ["sticker"])
    }

    /// [addStickerToSet](https://core.telegram.org/bots/api#addstickertoset)
    pub fn add_sticker_to_set(&self, params: Value) -> MethodCall {
        self.call("addStickerToSet", params)
            .media_params("sticker", ["sticker"])
    }

    /// [replaceStickerInSet](https://core.telegram.org/bots/api#replacestickerinset)
    pub fn replace_sticker_in_set(&self, params: Value) -> MethodCall {
        self.call("replaceStickerInSet", params)
            .media_params("sticker", ["sticker"])
    }

    /// [setStickerPositionInSet](https://core.telegram.org/bots/api#setstickerpositioninset)
    pub fn set_sticker_position_in_set(&self, params: Value) -> MethodCall {
        self.call("setStickerPositionInSet", params)
    }

    /// [deleteStickerFromSet](https://core.telegram.org/bots/api#deletestickerfromset)
    pub fn delete_sticker_from_set(&self, params: Value) -> MethodCall {
        self.call("deleteStickerFromSet", params)
    }

    /// [setStickerSetThumbnail](https://core.telegram.org/bots/api#setstickersetthumbnail)
    pub fn set_sticker_set_thumbnail(&self, params: Value) -> MethodCall {
        self.call("setStickerSetThumbnail", params)
            .file_params(["thumbnail"])
    }

    /// [answerWebAppQuery](https://core.telegram.org/bots/api#answerwebappquery)
    pub fn answer_web_app_query(&self, params: Value) -> MethodCall {
        self.call("answerWebAppQuery", params)
    }

    /// [sendInvoice](https://core.telegram.org/bots/api#sendinvoice)
    pub fn send_invoice(&self, params: Value) -> MethodCall {
        self.call("sendInvoice", params)
    }

    /// [createInvoiceLink](https://core.telegram.org/bots/api#createinvoicelink)
    pub fn create_invoice_link(&self, params: Value) -> MethodCall {
        self.call("createInvoiceLink", params)
    }

    /// [answerShippingQuery](https://core.telegram.org/bots/api#answershippingquery)
    pub fn answer_shipping_query(&self, params: Value) -> MethodCall {
        self.call("answerShippingQuery", params)
    }

    /// [answerPreCheckoutQuery](https://core.telegram.org/bots/api#answerprecheckoutquery)
    pub fn answer_pre_checkout_query(&self, params: Value) -> MethodCall {
        self.call("answerPreCheckoutQuery", params)
    }

    /// [getStarTransactions](https://core.telegram.org/bots/api#getstartransactions)
    pub fn get_star_transactions(&self, params: Value) -> MethodCall {
        self.call("getStarTransactions", params)
    }

    /// [refundStarPayment](https://core.telegram.org/bots/api#refundstarpayment)
    pub fn refund_star_payment(&self, params: Value) -> MethodCall {
        self.call("refundStarPayment", params)
    }

    /// [sendGame](https://core.telegram.org/bots/api#sendgame)
    pub fn send_game(&self, params: Value) -> MethodCall {
        self.call("sendGame", params)
    }

    /// [setGameScore](https://core.telegram.org/bots/api#setgamescore)
    pub fn set_game_score(&self, params: Value) -> MethodCall {
        self.call("setGameScore", params)
    }

    /// [getGameHighScores](https://core.telegram.org/bots/api#getgamehighscores)
    pub fn get_game_high_scores(&self, params: Value) -> MethodCall {
        self.call("getGameHighScores", params)
    }

    /// [setBusinessAccountProfilePhoto](https://core.telegram.org/bots/api#setbusinessaccountprofilephoto)
    pub fn set_business_account_profile_photo(&self, params: Value) -> MethodCall {
        self.call("setBusinessAccountProfilePhoto", params)
            .media_params("photo", ["animation", "photo"])
    }

    /// [postStory](https://core.telegram.org/bots/api#poststory)
    pub fn post_story(&self, params: Value) -> MethodCall {
        self.call("postStory", params)
            .media_params("content", ["video", "photo"])
    }

    /// [editStory](https://core.telegram.org/bots/api#editstory)
    pub fn edit_story(&self, params: Value) -> MethodCall {
        self.call("editStory", params)
            .media_params("content", ["video", "photo"])
    }

    /// [deleteStory](https://core.telegram.org/bots/api#deletestory)
    pub fn delete_story(&self, params: Value) -> MethodCall {
        self.call("deleteStory", params)
    }
}
