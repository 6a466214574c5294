/// Consuming push/extend for accumulator folds.
pub trait Merge<T>: Sized {
	/// Appends a single item and hands the collection back.
	fn merge( self, item: T ) -> Self ;
	/// Appends every item and hands the collection back.
	fn merge_all( self, items: impl IntoIterator<Item = T> ) -> Self ;
}

impl<T> Merge<T> for Vec<T> {
	#[inline]
	fn merge( mut self, item: T ) -> Self {
		self.push( item );
		self
	}
	#[inline]
	fn merge_all( mut self, items: impl IntoIterator<Item = T> ) -> Self {
		self.extend( items );
		self
	}
}
