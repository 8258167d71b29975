//! Retouch - AI image editing with a linear undo history
//!
//! Upload an image, send edit instructions to a generative model, then
//! accept, undo or redo the results.

pub mod editing;
