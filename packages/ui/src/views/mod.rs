mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod notes_view;
pub use notes_view::NotesView;
